//! Convenient re-exports for downstream crates.

pub use crate::config::RunConfig;
pub use crate::error::{Error, Result, SeqError};
pub use crate::group::Group;
pub use crate::value::{InstanceOf, Value, ValueKind};
