//! PrintRAPI print server - HTTP front door for a USB receipt printer
//!
//! # Modules
//!
//! ```text
//! print-server/src/
//! ├── core/       # configuration, shared state, HTTP server
//! ├── auth/       # shared-secret check, rate limiting
//! ├── api/        # routes and handlers
//! ├── printing/   # receipt layout, print jobs, printer connectors
//! └── utils/      # errors, logging, input validation
//! ```
//!
//! A request flows through query binding, rate limiting, the
//! `x-PrintRAPI-key` check and the length limit before a printer handle
//! is opened for it.

pub mod api;
pub mod auth;
pub mod core;
pub mod printing;
pub mod utils;

pub use crate::core::{AppState, Config, Server};
pub use utils::logger::init_logger_with_file;
pub use utils::{AppError, AppResult};
