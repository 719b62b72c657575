//! `oggcast` Core Library
//!
//! Everything between the command line and the streaming session:
//! - Session configuration and the `SourceSession` contract
//! - Metadata file loader
//! - Control flags and the signal bridge that sets them
//! - The forward loop and the orchestrator driving it
//! - Common error types

pub mod config;
pub mod error;
pub mod flags;
pub mod metadata;
pub mod orchestrator;
pub mod relay;
pub mod session;
#[cfg(unix)]
pub mod signals;
pub mod tracing_init;

pub use config::{SessionConfig, StreamFormat, TlsMode};
pub use error::{Error, Result, SessionError};
pub use flags::ControlFlags;
pub use orchestrator::Orchestrator;
pub use relay::{BUFFER_SIZE, RelayOutcome};
pub use session::{SessionSetting, SourceSession};
