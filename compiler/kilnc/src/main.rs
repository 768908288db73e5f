//! Kiln compiler CLI.

use kilnc::{compile_unit, init_tracing, UnitOptions};

fn print_usage() {
    eprintln!("Usage: kilnc <file.kn> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -D <key>=<value>      Seed a compile-time config entry");
    eprintln!("  --max-unroll=<n>      Elements a single #for may unroll");
    eprintln!("  --max-depth=<n>       Nested compile-time calls allowed");
    eprintln!("  --emit-ast            Print the expanded AST");
}

fn parse_limit(arg: &str, value: &str) -> usize {
    value.parse().unwrap_or_else(|_| {
        eprintln!("error: invalid value in `{arg}`");
        std::process::exit(1);
    })
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(path) = args.get(1).filter(|arg| !arg.starts_with('-')) else {
        print_usage();
        std::process::exit(1);
    };

    let mut options = UnitOptions::new(path.as_str());
    let mut emit_ast = false;
    let mut i = 2;
    while i < args.len() {
        let arg = &args[i];
        if arg == "-D" && i + 1 < args.len() {
            let Some((key, value)) = UnitOptions::parse_config_arg(&args[i + 1]) else {
                eprintln!("error: expected `key=value` after -D, got `{}`", args[i + 1]);
                std::process::exit(1);
            };
            options = options.with_config(key, value);
            i += 2;
            continue;
        }
        if let Some(value) = arg.strip_prefix("--max-unroll=") {
            options.max_unroll = parse_limit(arg, value);
        } else if let Some(value) = arg.strip_prefix("--max-depth=") {
            options.max_call_depth = parse_limit(arg, value);
        } else if arg == "--emit-ast" {
            emit_ast = true;
        } else {
            eprintln!("error: unknown option `{arg}`");
            print_usage();
            std::process::exit(1);
        }
        i += 1;
    }

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read `{path}`: {err}");
            std::process::exit(1);
        }
    };

    match compile_unit(&source, &options) {
        Ok(unit) => {
            if emit_ast {
                for stmt in &unit.stmts {
                    println!("{stmt:#?}");
                }
            }
            println!("{}: {} statements", unit.name, unit.stmts.len());
        }
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.render(&options.name, &source));
            std::process::exit(1);
        }
    }
}
