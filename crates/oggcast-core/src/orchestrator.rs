//! Session lifecycle, one method per phase.
//!
//! The binary drives the phases in order and installs signal listeners in
//! between:
//!
//! ```text
//! configure -> prime -> open -> forward -> close
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::flags::ControlFlags;
use crate::metadata::apply_metadata;
use crate::relay::{InputBuffer, RelayOutcome, forward};
use crate::session::SourceSession;

/// Sole owner of the session for the lifetime of the process.
pub struct Orchestrator<S, R> {
    session: S,
    input: InputBuffer<R>,
    flags: Arc<ControlFlags>,
    metadata_path: Option<PathBuf>,
}

impl<S, R> Orchestrator<S, R>
where
    S: SourceSession,
    R: AsyncRead + Unpin,
{
    pub fn new(session: S, input: R, flags: Arc<ControlFlags>) -> Self {
        Self {
            session,
            input: InputBuffer::new(input),
            flags,
            metadata_path: None,
        }
    }

    /// Push the configuration into the session.
    ///
    /// Connection settings must all be accepted. The metadata file, if any, is
    /// loaded next, then the descriptive strings from the command line, which
    /// therefore win at startup.
    pub fn configure(&mut self, config: &SessionConfig) -> Result<()> {
        for setting in config.connection_settings() {
            let field = setting.field();
            self.session
                .set(setting)
                .map_err(|e| Error::Config(format!("Error setting {field}: {e}")))?;
        }

        self.metadata_path.clone_from(&config.metadata_path);
        if self.metadata_path.is_some() {
            self.reload_metadata();
        }

        for setting in config.info_settings() {
            let field = setting.field();
            if let Err(e) = self.session.set(setting) {
                warn!(field, error = %e, "Session rejected setting");
            }
        }

        debug!(
            host = %config.host,
            port = config.port,
            mount = %config.mount,
            tls = %config.tls,
            public = config.public,
            "Session configured"
        );
        Ok(())
    }

    /// Re-read the metadata file into the session. Never fails.
    pub fn reload_metadata(&mut self) -> usize {
        apply_metadata(self.metadata_path.as_deref(), &mut self.session)
    }

    /// Wait for the first buffer of input before touching the network.
    pub async fn prime(&mut self) -> usize {
        let read = self.input.fill().await;
        debug!(bytes = read, "Input primed");
        read
    }

    pub async fn open(&mut self) -> Result<()> {
        if let Err(e) = self.session.open().await {
            return Err(Error::Session(e));
        }
        info!("Connected to server");
        Ok(())
    }

    /// Run the forward loop until quit.
    pub async fn forward(&mut self) -> RelayOutcome {
        forward(
            &mut self.session,
            &mut self.input,
            &self.flags,
            self.metadata_path.as_deref(),
        )
        .await
    }

    /// Close the session and hand it back.
    ///
    /// Close failures are logged only; the stream already ended.
    pub async fn close(mut self) -> S {
        if let Err(e) = self.session.close().await {
            warn!(error = %e, "Error closing session");
        }
        self.session
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub const fn flags(&self) -> &Arc<ControlFlags> {
        &self.flags
    }
}
