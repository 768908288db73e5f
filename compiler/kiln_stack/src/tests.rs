use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_deep_recursion() {
    // Would overflow a typical 8MB stack without growth
    fn deep_recurse(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { deep_recurse(n - 1) + 1 })
    }

    assert_eq!(deep_recurse(100_000), 100_000);
}

#[test]
fn test_works_with_result_type() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Ok(123));
    assert_eq!(result, Ok(123));
}

struct Machine {
    depth: DepthCounter,
    deepest: usize,
}

fn descend(machine: &mut Machine, remaining: usize) -> Result<(), DepthExceeded> {
    machine.deepest = machine.deepest.max(machine.depth.depth());
    if remaining == 0 {
        return Ok(());
    }
    DepthCounter::nested(machine, |m| &mut m.depth, |m| descend(m, remaining - 1))?
}

#[test]
fn test_nested_within_limit_restores_depth() {
    let mut machine = Machine {
        depth: DepthCounter::new(8),
        deepest: 0,
    };
    assert_eq!(descend(&mut machine, 8), Ok(()));
    assert_eq!(machine.deepest, 8);
    assert_eq!(machine.depth.depth(), 0);
}

#[test]
fn test_nested_past_limit_fails_and_unwinds() {
    let mut machine = Machine {
        depth: DepthCounter::new(3),
        deepest: 0,
    };
    assert_eq!(descend(&mut machine, 10), Err(DepthExceeded { limit: 3 }));
    assert_eq!(machine.depth.depth(), 0);
    assert_eq!(DepthExceeded { limit: 3 }.to_string(), "recursion limit of 3 exceeded");
}
