//! Observability infrastructure for crash reports and debugging.
//!
//! - **Panic hook**: structured crash report with build context
//! - **Context tracking**: thread-local build phase, unit and file
//! - **Progress tracking**: atomic counters over processed units
//!
//! ```ignore
//! use covsuite::observability::{install_panic_hook, set_phase, BuildPhase};
//!
//! install_panic_hook();
//! let _phase = set_phase(BuildPhase::Selection);
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_context, set_current_file,
    set_current_unit, set_phase, set_progress, BuildContext, BuildPhase, ContextGuard,
};
pub use panic_hook::install_panic_hook;
