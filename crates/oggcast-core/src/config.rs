//! Session configuration built from the command line.
//!
//! A [`SessionConfig`] is assembled once before the session is created and is
//! not touched after the session opens. It is turned into a sequence of
//! [`SessionSetting`]s which are pushed into the session in a fixed order:
//! connection settings first, then the descriptive strings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::session::SessionSetting;

/// Longest accepted option argument, in bytes (exclusive).
pub const MAX_ARGUMENT_LEN: usize = 4095;

/// Container format of the relayed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamFormat {
    #[default]
    Ogg,
}

impl StreamFormat {
    /// MIME type announced to the server.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Ogg => "application/ogg",
        }
    }
}

/// TLS negotiation policy for the source connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Plaintext only.
    Disabled,
    /// Try an in-band TLS upgrade, fall back to plaintext.
    #[default]
    Auto,
    /// Try an in-band TLS upgrade, never fall back to plaintext.
    AutoNoPlain,
    /// TLS from the first byte (HTTPS).
    Rfc2818,
    /// In-band upgrade via `Upgrade: TLS/1.0`.
    Rfc2817,
}

impl TlsMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Auto => "auto",
            Self::AutoNoPlain => "auto_no_plain",
            Self::Rfc2818 => "rfc2818",
            Self::Rfc2817 => "rfc2817",
        }
    }

    /// Whether a plaintext connection is acceptable under this policy.
    pub const fn allows_plaintext(self) -> bool {
        matches!(self, Self::Disabled | Self::Auto)
    }
}

impl fmt::Display for TlsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TlsMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "auto" => Ok(Self::Auto),
            "auto_no_plain" => Ok(Self::AutoNoPlain),
            "rfc2818" => Ok(Self::Rfc2818),
            "rfc2817" => Ok(Self::Rfc2817),
            other => Err(Error::Config(format!(
                "invalid TLS mode '{other}' (expected disabled, auto, auto_no_plain, rfc2818 or rfc2817)"
            ))),
        }
    }
}

/// Everything needed to configure one source session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub mount: String,
    pub format: StreamFormat,
    /// List the stream in public directories.
    pub public: bool,
    pub tls: TlsMode,
    pub name: Option<String>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// `key=value` file re-read on reload requests.
    pub metadata_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Create a config with the four required values and defaults elsewhere.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        password: impl Into<String>,
        mount: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            password: password.into(),
            mount: mount.into(),
            format: StreamFormat::Ogg,
            public: false,
            tls: TlsMode::default(),
            name: None,
            genre: None,
            description: None,
            url: None,
            metadata_path: None,
        }
    }

    /// Settings that describe the connection itself, in application order.
    pub fn connection_settings(&self) -> Vec<SessionSetting> {
        vec![
            SessionSetting::Format(self.format),
            SessionSetting::Tls(self.tls),
            SessionSetting::Host(self.host.clone()),
            SessionSetting::Port(self.port),
            SessionSetting::Password(self.password.clone()),
            SessionSetting::Mount(self.mount.clone()),
            SessionSetting::Public(self.public),
        ]
    }

    /// Descriptive strings given on the command line.
    ///
    /// These are applied after the metadata file so they take precedence at
    /// startup; a later reload may replace them.
    pub fn info_settings(&self) -> Vec<SessionSetting> {
        let mut settings = Vec::new();
        if let Some(description) = &self.description {
            settings.push(SessionSetting::Description(description.clone()));
        }
        if let Some(genre) = &self.genre {
            settings.push(SessionSetting::Genre(genre.clone()));
        }
        if let Some(name) = &self.name {
            settings.push(SessionSetting::Name(name.clone()));
        }
        if let Some(url) = &self.url {
            settings.push(SessionSetting::Url(url.clone()));
        }
        settings
    }
}

/// Reject option arguments of [`MAX_ARGUMENT_LEN`] bytes or more.
pub fn check_argument_len(flag: char, value: &str) -> Result<()> {
    if value.len() >= MAX_ARGUMENT_LEN {
        return Err(Error::Config(format!(
            "argument for parameter -{flag} too long"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_mode_parses_case_insensitively() {
        assert_eq!("DISABLED".parse::<TlsMode>().unwrap(), TlsMode::Disabled);
        assert_eq!("Auto".parse::<TlsMode>().unwrap(), TlsMode::Auto);
        assert_eq!(
            "auto_no_plain".parse::<TlsMode>().unwrap(),
            TlsMode::AutoNoPlain
        );
        assert_eq!("RFC2818".parse::<TlsMode>().unwrap(), TlsMode::Rfc2818);
        assert_eq!("rfc2817".parse::<TlsMode>().unwrap(), TlsMode::Rfc2817);
    }

    #[test]
    fn tls_mode_rejects_unknown_keyword() {
        let err = "starttls".parse::<TlsMode>().unwrap_err();
        assert!(err.to_string().contains("starttls"));
    }

    #[test]
    fn tls_mode_display_roundtrips() {
        for mode in [
            TlsMode::Disabled,
            TlsMode::Auto,
            TlsMode::AutoNoPlain,
            TlsMode::Rfc2818,
            TlsMode::Rfc2817,
        ] {
            assert_eq!(mode.to_string().parse::<TlsMode>().unwrap(), mode);
        }
    }

    #[test]
    fn plaintext_policy() {
        assert!(TlsMode::Disabled.allows_plaintext());
        assert!(TlsMode::Auto.allows_plaintext());
        assert!(!TlsMode::AutoNoPlain.allows_plaintext());
        assert!(!TlsMode::Rfc2818.allows_plaintext());
        assert!(!TlsMode::Rfc2817.allows_plaintext());
    }

    #[test]
    fn connection_settings_order() {
        let config = SessionConfig::new("radio.example.org", 8000, "hackme", "/live.ogg");
        let settings = config.connection_settings();
        assert_eq!(settings.len(), 7);
        assert_eq!(settings[0], SessionSetting::Format(StreamFormat::Ogg));
        assert_eq!(settings[1], SessionSetting::Tls(TlsMode::Auto));
        assert_eq!(
            settings[2],
            SessionSetting::Host("radio.example.org".to_string())
        );
        assert_eq!(settings[3], SessionSetting::Port(8000));
        assert_eq!(settings[6], SessionSetting::Public(false));
    }

    #[test]
    fn info_settings_only_include_given_fields() {
        let mut config = SessionConfig::new("localhost", 8000, "pw", "/a.ogg");
        assert!(config.info_settings().is_empty());

        config.name = Some("Night Shift".to_string());
        config.url = Some("https://example.org".to_string());
        assert_eq!(
            config.info_settings(),
            vec![
                SessionSetting::Name("Night Shift".to_string()),
                SessionSetting::Url("https://example.org".to_string()),
            ]
        );
    }

    #[test]
    fn argument_length_limit() {
        assert!(check_argument_len('n', &"x".repeat(MAX_ARGUMENT_LEN - 1)).is_ok());
        let err = check_argument_len('n', &"x".repeat(MAX_ARGUMENT_LEN)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: argument for parameter -n too long"
        );
    }
}
