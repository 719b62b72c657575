//! Icecast source session over libshout.

use oggcast_core::{SessionError, SessionSetting, SourceSession, StreamFormat, TlsMode};
use shout::{ShoutConn, ShoutConnBuilder, ShoutFormat, ShoutMeta, ShoutProtocol};
use tracing::{debug, info};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;

/// Account name Icecast expects for source clients.
pub const SOURCE_USER: &str = "source";

/// Whether `setting` may be changed in the current connection state.
///
/// Descriptive strings are always accepted; they reach the server on the next
/// `open`.
const fn settable(connected: bool, setting: &SessionSetting) -> bool {
    !connected || setting.is_descriptive()
}

/// A source connection to an Icecast server.
///
/// Settings are collected here and handed to libshout when the session opens.
/// libshout calls block, which is what the relay wants: `send` returns once
/// the data is written and `sync` sleeps until the server is ready for more.
pub struct IcecastSession {
    format: StreamFormat,
    host: String,
    port: u16,
    password: String,
    mount: String,
    public: bool,
    name: Option<String>,
    genre: Option<String>,
    description: Option<String>,
    url: Option<String>,

    conn: Option<ShoutConn>,
    last_error: Option<String>,
}

impl Default for IcecastSession {
    fn default() -> Self {
        Self {
            format: StreamFormat::Ogg,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            password: String::new(),
            mount: String::new(),
            public: false,
            name: None,
            genre: None,
            description: None,
            url: None,
            conn: None,
            last_error: None,
        }
    }
}

impl IcecastSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub const fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn record(&mut self, error: SessionError) -> SessionError {
        self.last_error = Some(error.to_string());
        error
    }

    fn check_ready(&self) -> Result<(), SessionError> {
        if self.mount.is_empty() {
            return Err(SessionError::InvalidSetting("mount is not set".to_string()));
        }
        if self.password.is_empty() {
            return Err(SessionError::InvalidSetting(
                "password is not set".to_string(),
            ));
        }
        Ok(())
    }

    fn builder(&self) -> ShoutConnBuilder {
        let format = match self.format {
            StreamFormat::Ogg => ShoutFormat::Ogg,
        };
        let mut builder = ShoutConnBuilder::new()
            .host(self.host.clone())
            .port(self.port)
            .user(SOURCE_USER.to_string())
            .password(self.password.clone())
            .mount(self.mount.clone())
            .protocol(ShoutProtocol::HTTP)
            .format(format)
            .public(u32::from(self.public));
        if let Some(name) = &self.name {
            builder = builder.add_meta(ShoutMeta::Name(name.clone()));
        }
        if let Some(genre) = &self.genre {
            builder = builder.add_meta(ShoutMeta::Genre(genre.clone()));
        }
        if let Some(description) = &self.description {
            builder = builder.add_meta(ShoutMeta::Description(description.clone()));
        }
        if let Some(url) = &self.url {
            builder = builder.add_meta(ShoutMeta::Url(url.clone()));
        }
        builder
    }
}

impl SourceSession for IcecastSession {
    fn set(&mut self, setting: SessionSetting) -> Result<(), SessionError> {
        if !settable(self.is_open(), &setting) {
            return Err(self.record(SessionError::Connected));
        }

        match setting {
            SessionSetting::Format(format) => self.format = format,
            SessionSetting::Tls(mode) => {
                // libshout picks plaintext on its own in auto mode.
                if !matches!(mode, TlsMode::Disabled | TlsMode::Auto) {
                    return Err(self.record(SessionError::Unsupported(format!(
                        "TLS mode {mode} is not available"
                    ))));
                }
            }
            SessionSetting::Host(host) => {
                if host.is_empty() {
                    return Err(self.record(SessionError::InvalidSetting(
                        "host must not be empty".to_string(),
                    )));
                }
                self.host = host;
            }
            SessionSetting::Port(port) => {
                if port == 0 {
                    return Err(self.record(SessionError::InvalidSetting(
                        "port must not be 0".to_string(),
                    )));
                }
                self.port = port;
            }
            SessionSetting::Password(password) => self.password = password,
            SessionSetting::Mount(mount) => {
                if mount.is_empty() {
                    return Err(self.record(SessionError::InvalidSetting(
                        "mount must not be empty".to_string(),
                    )));
                }
                self.mount = if mount.starts_with('/') {
                    mount
                } else {
                    format!("/{mount}")
                };
            }
            SessionSetting::Public(public) => self.public = public,
            SessionSetting::Name(v) => self.name = Some(v),
            SessionSetting::Genre(v) => self.genre = Some(v),
            SessionSetting::Description(v) => self.description = Some(v),
            SessionSetting::Url(v) => self.url = Some(v),
        }
        Ok(())
    }

    async fn open(&mut self) -> Result<(), SessionError> {
        if self.is_open() {
            return Err(self.record(SessionError::Connected));
        }
        if let Err(e) = self.check_ready() {
            return Err(self.record(e));
        }

        debug!(host = %self.host, port = self.port, mount = %self.mount, "Opening source session");
        match self.builder().build() {
            Ok(conn) => {
                self.conn = Some(conn);
                info!(
                    host = %self.host,
                    port = self.port,
                    mount = %self.mount,
                    "Source session open"
                );
                Ok(())
            }
            Err(e) => {
                let err = SessionError::Connect(format!(
                    "{}:{}{}: {e:?}",
                    self.host, self.port, self.mount
                ));
                Err(self.record(err))
            }
        }
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), SessionError> {
        let Some(conn) = self.conn.as_ref() else {
            return Err(self.record(SessionError::NotConnected));
        };
        if let Err(e) = conn.send(data) {
            return Err(self.record(SessionError::Send(format!("{e:?}"))));
        }
        Ok(())
    }

    async fn sync(&mut self) {
        if let Some(conn) = self.conn.as_ref() {
            conn.sync();
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        // Dropping the connection closes it inside libshout.
        if self.conn.take().is_some() {
            info!("Source session closed");
        }
        Ok(())
    }

    fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
