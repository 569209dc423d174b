//! HTTP handlers for the machine_status data routes.

pub mod machine_status;
pub use machine_status::*;
