//! HTTP server: configuration, middleware, handlers, and shutdown control.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use error::{ApiError, ErrorBody};
pub use handlers::AppState;
pub use module::NetworkModule;
pub use shutdown::*;
