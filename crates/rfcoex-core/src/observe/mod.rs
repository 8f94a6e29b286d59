//! # Observability
//!
//! The engine emits `tracing` events at stage boundaries; this module
//! installs a subscriber for binaries and tests that want to see them.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ analysis / power / config                    │
//! │   debug!(generated = n), info!(hits = n)     │
//! └──────────────────────┬───────────────────────┘
//!                        │
//!                        ▼
//!            ┌──────────────────────┐
//!            │ EnvFilter (RUST_LOG) │
//!            └──────────┬───────────┘
//!                       ▼
//!        fmt layer: json | pretty | compact
//!                       │
//!                       ▼
//!              stderr  or  log file
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
