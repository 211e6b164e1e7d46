//! Thread-local context tracking for crash reports.
//!
//! Records which build phase, unit and input file the current thread is
//! working on. Per-thread context works with rayon workers; progress over
//! units is kept in global atomic counters.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static UNITS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static UNITS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<BuildContext> = const { RefCell::new(BuildContext::new()) };
}

/// Snapshot of what covsuite was doing on this thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    pub phase: Option<BuildPhase>,
    /// Unit whose suite is being selected or rendered
    pub current_unit: Option<String>,
    /// Input or output file being processed
    pub current_file: Option<PathBuf>,
}

impl BuildContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_unit: None,
            current_file: None,
        }
    }
}

/// Major stages of a covsuite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Reading exported coverage into the record store
    Ingest,
    /// Loading the store and grouping records by unit
    Aggregation,
    /// Greedy suite selection
    Selection,
    /// Writing manifests and reports
    Rendering,
}

impl std::fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingest => write!(f, "ingest"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::Selection => write!(f, "selection"),
            Self::Rendering => write!(f, "rendering"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: BuildContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut BuildContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current build phase until the guard drops.
#[must_use]
pub fn set_phase(phase: BuildPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

/// Set the unit being processed until the guard drops.
#[must_use]
pub fn set_current_unit(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_unit = Some(name))
}

/// Set the file being processed until the guard drops.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

pub fn set_progress(processed: usize, total: usize) {
    UNITS_PROCESSED.store(processed, Ordering::Relaxed);
    UNITS_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; called from rayon workers.
pub fn increment_processed() {
    UNITS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> BuildContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total) units.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        UNITS_PROCESSED.load(Ordering::Relaxed),
        UNITS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = BuildContext::new();
    });
}
