//! HTTP bridge to the brief backend.
//!
//! The backend is a set of n8n webhook workflows behind one base URL. This
//! crate wraps them in a typed client ([`ApiClient`]), adds the periodic
//! status watch ([`spawn_status_watch`]) and packages both behind a
//! channel-based handle ([`BackendHandle`]) so a synchronous shell never
//! touches the runtime directly.

mod backend;
mod client;
mod config;
mod error;
mod poller;
mod wire;

pub use backend::{BackendEvent, BackendHandle};
pub use client::ApiClient;
pub use config::{ApiSettings, ConfigError};
pub use error::ApiError;
pub use poller::{spawn_status_watch, PollEvent, PollSink, PollerHandle, PollerSettings};
