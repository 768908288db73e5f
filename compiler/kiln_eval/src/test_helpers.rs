//! Hand-built ASTs for evaluator tests.

use kiln_ir::{
    BinaryOp, Block, DeclKind, Expr, ExprKind, Name, Param, SharedInterner, Stmt, StmtKind,
};
use kiln_num::Numeric;

use crate::{CompileTimeConfig, Evaluator};

pub(crate) struct Build {
    pub interner: SharedInterner,
}

impl Build {
    pub fn new() -> Self {
        Build {
            interner: SharedInterner::new(),
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.interner.clone(), CompileTimeConfig::new())
    }

    pub fn name(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn num(&self, n: i64) -> Expr {
        Expr::synthetic(ExprKind::Number(Numeric::Int(n)))
    }

    pub fn string(&self, text: &str) -> Expr {
        Expr::synthetic(ExprKind::Str(self.name(text)))
    }

    pub fn boolean(&self, b: bool) -> Expr {
        Expr::synthetic(ExprKind::Bool(b))
    }

    pub fn ident(&self, text: &str) -> Expr {
        Expr::synthetic(ExprKind::Ident(self.name(text)))
    }

    pub fn field(&self, receiver: Expr, field: &str) -> Expr {
        Expr::synthetic(ExprKind::Field {
            receiver: Box::new(receiver),
            field: self.name(field),
        })
    }

    /// Call a dotted path such as `ast.Identifier`.
    pub fn call(&self, path: &str, args: Vec<Expr>) -> Expr {
        let mut parts = path.split('.');
        let mut callee = self.ident(parts.next().unwrap_or(path));
        for part in parts {
            callee = self.field(callee, part);
        }
        Expr::synthetic(ExprKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    /// Call a method-like field: `receiver.method(args)`.
    pub fn call_on(&self, receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
        Expr::synthetic(ExprKind::Call {
            callee: Box::new(self.field(receiver, method)),
            args,
        })
    }

    pub fn binary(&self, op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::synthetic(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn lambda(&self, params: &[&str], body: Vec<Stmt>) -> Expr {
        Expr::synthetic(ExprKind::Lambda {
            params: params
                .iter()
                .map(|p| Param {
                    name: self.name(p),
                    ty: None,
                })
                .collect(),
            body: Block::new(body),
        })
    }

    pub fn decl(&self, decl: DeclKind, name: &str, init: Expr) -> Stmt {
        Stmt::synthetic(StmtKind::Let {
            name: self.name(name),
            decl,
            ty: None,
            init,
        })
    }

    pub fn assign(&self, name: &str, value: Expr) -> Stmt {
        Stmt::synthetic(StmtKind::Assign {
            target: self.ident(name),
            value,
        })
    }

    pub fn ret(&self, value: Expr) -> Stmt {
        Stmt::synthetic(StmtKind::Return(Some(value)))
    }

    pub fn expr(&self, expr: Expr) -> Stmt {
        Stmt::synthetic(StmtKind::Expr(expr))
    }
}
