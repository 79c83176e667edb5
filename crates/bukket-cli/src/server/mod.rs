//! HTTP server startup with lifecycle management.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

pub use error::{ServerError, ServerResult};
pub use http_server::serve_http as serve;
use shutdown::shutdown_signal;
