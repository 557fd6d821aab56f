//! goinst unified configuration layer.
//!
//! Every environment variable read happens here; the rest of the workspace
//! accesses structured config instead of calling `std::env::var` directly.
//!
//! - `loader`: env_or, env_optional, env_bool helpers
//! - `schema`: InstallConfig, ObservabilityConfig, IsolationMode
//! - `env_keys`: key constants

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::{env_bool, env_optional, env_or};
pub use schema::{InstallConfig, IsolationMode, ObservabilityConfig};
