//! goinst commands.
//!
//! Depends on the sandbox layer for the individual steps; this crate owns the
//! ordering, the failure contract and the operator-facing report.

pub mod error;
pub mod install;
pub mod plan;

pub use error::InstallError;
pub use install::{run_install, InstallPipeline, InstallReport, PipelineState};
pub use plan::InstallPlan;
