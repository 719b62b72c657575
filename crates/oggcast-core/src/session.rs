//! The streaming session contract.
//!
//! The forward loop and the orchestrator only ever talk to a session through
//! [`SourceSession`]. Connection handshake, authentication, TLS and pacing are
//! the implementation's business.

use crate::config::{StreamFormat, TlsMode};
use crate::error::SessionError;

/// One configurable field of a session together with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSetting {
    Format(StreamFormat),
    Tls(TlsMode),
    Host(String),
    Port(u16),
    Password(String),
    Mount(String),
    Public(bool),
    Name(String),
    Genre(String),
    Description(String),
    Url(String),
}

impl SessionSetting {
    /// Field name, for diagnostics. Never includes the value.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Format(_) => "format",
            Self::Tls(_) => "tls",
            Self::Host(_) => "host",
            Self::Port(_) => "port",
            Self::Password(_) => "password",
            Self::Mount(_) => "mount",
            Self::Public(_) => "public",
            Self::Name(_) => "name",
            Self::Genre(_) => "genre",
            Self::Description(_) => "description",
            Self::Url(_) => "url",
        }
    }

    /// Descriptive strings may change while the session is open.
    pub const fn is_descriptive(&self) -> bool {
        matches!(
            self,
            Self::Name(_) | Self::Genre(_) | Self::Description(_) | Self::Url(_)
        )
    }
}

/// A source connection to a streaming server.
///
/// Lifecycle: `set` any number of times, `open` once, then `send`/`sync`
/// repeatedly, then `close` once.
#[allow(async_fn_in_trait)]
pub trait SourceSession {
    /// Apply one setting.
    fn set(&mut self, setting: SessionSetting) -> Result<(), SessionError>;

    /// Connect and perform the source handshake.
    async fn open(&mut self) -> Result<(), SessionError>;

    /// Forward one buffer of stream data. `data` is never empty.
    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError>;

    /// Block until the session judges it safe to send more data.
    async fn sync(&mut self);

    /// Tear the connection down.
    async fn close(&mut self) -> Result<(), SessionError>;

    /// Message describing the most recent failure, if any.
    fn last_error(&self) -> Option<&str>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptive_settings() {
        assert!(SessionSetting::Name(String::new()).is_descriptive());
        assert!(SessionSetting::Genre(String::new()).is_descriptive());
        assert!(SessionSetting::Description(String::new()).is_descriptive());
        assert!(SessionSetting::Url(String::new()).is_descriptive());
        assert!(!SessionSetting::Host(String::new()).is_descriptive());
        assert!(!SessionSetting::Public(true).is_descriptive());
    }

    #[test]
    fn field_name_hides_value() {
        let setting = SessionSetting::Password("hackme".to_string());
        assert_eq!(setting.field(), "password");
    }
}
