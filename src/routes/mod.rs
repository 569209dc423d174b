//! Route groups.

pub mod common;
pub mod machine_status;

pub use common::common_routes;
pub use machine_status::machine_status_routes;
