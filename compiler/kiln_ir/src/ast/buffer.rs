//! Cursor-addressed statement sequence.
//!
//! The parser appends host statements here while compile-time code edits the
//! same sequence relative to the cursor. The cursor sits between statements;
//! the *current* statement is the one immediately before it (the most recent
//! one emitted, unless code moved the cursor).

use std::fmt;

use super::Stmt;

/// A cursor operation had no statement to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CursorError {
    /// Nothing precedes the cursor.
    NoCurrent,
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::NoCurrent => f.write_str("no statement at the cursor"),
        }
    }
}

impl std::error::Error for CursorError {}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct StmtBuffer {
    stmts: Vec<Stmt>,
    cursor: usize,
}

impl StmtBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after the current statement and advance past it.
    pub fn emit(&mut self, stmt: Stmt) {
        self.stmts.insert(self.cursor, stmt);
        self.cursor += 1;
    }

    pub fn emit_all(&mut self, stmts: impl IntoIterator<Item = Stmt>) {
        for stmt in stmts {
            self.emit(stmt);
        }
    }

    /// Same as [`emit`](Self::emit): the new statement becomes current.
    pub fn insert_after(&mut self, stmt: Stmt) {
        self.emit(stmt);
    }

    /// Insert in front of the current statement; the current one stays current.
    pub fn insert_before(&mut self, stmt: Stmt) -> Result<(), CursorError> {
        let at = self.current_index()?;
        self.stmts.insert(at, stmt);
        self.cursor += 1;
        Ok(())
    }

    /// Replace the current statement, returning the old one.
    pub fn replace(&mut self, stmt: Stmt) -> Result<Stmt, CursorError> {
        let slot = self.current_index()?;
        Ok(std::mem::replace(&mut self.stmts[slot], stmt))
    }

    /// Remove the current statement; the previous one becomes current.
    pub fn delete(&mut self) -> Result<Stmt, CursorError> {
        let slot = self.current_index()?;
        self.cursor -= 1;
        Ok(self.stmts.remove(slot))
    }

    pub fn current(&self) -> Option<&Stmt> {
        self.current_index().ok().map(|i| &self.stmts[i])
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn as_slice(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn into_stmts(self) -> Vec<Stmt> {
        self.stmts
    }

    fn current_index(&self) -> Result<usize, CursorError> {
        self.cursor.checked_sub(1).ok_or(CursorError::NoCurrent)
    }
}
