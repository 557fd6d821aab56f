//! Fetch tool environment: every Go toolchain directory rooted in the workspace.
//!
//! The runner receives only the resulting `IsolatedGoEnv`; it never reads the
//! host toolchain variables itself.

pub mod builder;

pub use builder::IsolatedGoEnv;
