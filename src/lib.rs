//! Read-only REST API over the `machine_status` table.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use config::{DbConfig, ServerConfig};
pub use error::{AppError, ConfigError};
pub use routes::{common_routes, machine_status_routes};
pub use server::{build_app, serve, shutdown_signal};
pub use state::AppState;
pub use store::{connect, ConnectError, MachineStatusStore, PgStore};
