pub mod copier;
pub mod env;
pub mod error;
pub mod fetch_backend;
pub mod log;
pub mod runner;
pub mod workspace;

pub use error::{CopyError, CopyPhase, FetchError, ProvisionError, ReclaimError};
pub use fetch_backend::{FetchBackend, GoGetBackend};
pub use workspace::Workspace;
