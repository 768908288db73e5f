//! Deferred hooks: compile-time callbacks that run after a later phase.

use std::collections::VecDeque;
use std::fmt;

use kiln_ir::Span;

use crate::Value;

/// A later compiler phase a hook can wait for.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum HookPhase {
    AfterTypeInference,
    AfterAnalysis,
}

impl HookPhase {
    pub const ALL: [HookPhase; 2] = [HookPhase::AfterTypeInference, HookPhase::AfterAnalysis];

    fn index(self) -> usize {
        match self {
            HookPhase::AfterTypeInference => 0,
            HookPhase::AfterAnalysis => 1,
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::AfterTypeInference => f.write_str("after-type-inference"),
            HookPhase::AfterAnalysis => f.write_str("after-analysis"),
        }
    }
}

/// A queued callback.
#[derive(Clone, Debug)]
pub struct DeferredHook {
    pub phase: HookPhase,
    pub callback: Value,
    /// Where the hook was registered.
    pub span: Span,
}

/// Per-unit, per-phase FIFO queues.
///
/// A hook registered for a phase that has already completed runs in the
/// same drain that is in progress, or in the next one if none is.
#[derive(Debug, Default)]
pub struct HookScheduler {
    queues: [VecDeque<DeferredHook>; 2],
    completed: [bool; 2],
    ran: usize,
}

impl HookScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, phase: HookPhase, callback: Value, span: Span) {
        tracing::debug!(%phase, queued = self.queues[phase.index()].len(), "register hook");
        self.queues[phase.index()].push_back(DeferredHook {
            phase,
            callback,
            span,
        });
    }

    /// Record that `phase` finished for this unit.
    pub fn mark_complete(&mut self, phase: HookPhase) {
        self.completed[phase.index()] = true;
    }

    pub fn is_complete(&self, phase: HookPhase) -> bool {
        self.completed[phase.index()]
    }

    /// Next hook whose phase is complete, earliest phase first, then in
    /// registration order.
    pub fn take_ready(&mut self) -> Option<DeferredHook> {
        for phase in HookPhase::ALL {
            let i = phase.index();
            if !self.completed[i] {
                continue;
            }
            if let Some(hook) = self.queues[i].pop_front() {
                self.ran += 1;
                return Some(hook);
            }
        }
        None
    }

    pub fn pending(&self, phase: HookPhase) -> usize {
        self.queues[phase.index()].len()
    }

    /// Hooks taken so far.
    pub fn ran(&self) -> usize {
        self.ran
    }
}
