//! Stack safety for the parser/evaluator recursion.
//!
//! Parsing a compile-time block calls into the evaluator, which may parse a
//! quoted fragment, which may contain another splice, and so on. Two guards
//! keep that recursion safe:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand
//!   (`stacker` on native targets, passthrough on WASM).
//! - [`DepthCounter`] bounds *logical* recursion such as compile-time
//!   function calls, so runaway user code fails with an error instead of
//!   exhausting memory.

/// Keep at least this much stack free before recursing (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Allocate this much when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// The configured recursion limit was reached.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: usize,
}

impl std::fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "recursion limit of {} exceeded", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Counts nested entries against a fixed limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthCounter {
    depth: usize,
    limit: usize,
}

impl DepthCounter {
    pub fn new(limit: usize) -> Self {
        DepthCounter { depth: 0, limit }
    }

    /// Run `f` one level deeper, failing without calling it at the limit.
    ///
    /// The depth is restored when `f` returns, whatever it returns.
    pub fn nested<S, R>(
        state: &mut S,
        counter: impl Fn(&mut S) -> &mut DepthCounter,
        f: impl FnOnce(&mut S) -> R,
    ) -> Result<R, DepthExceeded> {
        let guard = counter(state);
        if guard.depth >= guard.limit {
            return Err(DepthExceeded { limit: guard.limit });
        }
        guard.depth += 1;
        let result = ensure_sufficient_stack(|| f(state));
        counter(state).depth -= 1;
        Ok(result)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests;
