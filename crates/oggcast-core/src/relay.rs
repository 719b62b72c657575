//! The forward loop: input buffer to session, one buffer per iteration.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{error, info, warn};

use crate::error::SessionError;
use crate::flags::ControlFlags;
use crate::metadata::apply_metadata;
use crate::session::SourceSession;

/// Bytes moved per iteration.
pub const BUFFER_SIZE: usize = 4096;

/// Fixed-size input buffer filled the way `fread` does it.
///
/// A fill keeps reading until the buffer is full or the input ends. Once the
/// input has ended no further read is attempted and every fill yields zero
/// bytes.
pub struct InputBuffer<R> {
    reader: R,
    buf: Vec<u8>,
    len: usize,
    eof: bool,
}

impl<R: AsyncRead + Unpin> InputBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; BUFFER_SIZE],
            len: 0,
            eof: false,
        }
    }

    /// Replace the buffer contents with the next chunk of input.
    ///
    /// A read error ends the input; bytes read before it are kept.
    pub async fn fill(&mut self) -> usize {
        self.len = 0;
        while !self.eof && self.len < self.buf.len() {
            match self.reader.read(&mut self.buf[self.len..]).await {
                Ok(0) => self.eof = true,
                Ok(n) => self.len += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!(error = %e, "Input read failed; treating as end of input");
                    self.eof = true;
                }
            }
        }
        self.len
    }

    pub fn filled(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub const fn is_eof(&self) -> bool {
        self.eof
    }
}

/// Result of one run of the forward loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    /// Bytes forwarded (or attempted) since the session opened.
    pub total: u64,
    /// Number of `send` calls made.
    pub sends: u64,
    /// The failure that ended the loop, if a send failed.
    pub send_error: Option<SessionError>,
}

/// Log target of byte-count reports. Enabled regardless of the log level.
pub const REPORT_TARGET: &str = "oggcast::report";

fn report_total(total: u64) {
    info!(target: REPORT_TARGET, total, "Total bytes read: {total}");
}

/// Forward `input` to `session` until a quit is requested or the input ends.
///
/// The buffer must already hold the first chunk (see [`InputBuffer::fill`]).
/// A failed send is not retried: it is logged, recorded in the outcome, and
/// ends the loop like end of input does.
pub async fn forward<S, R>(
    session: &mut S,
    input: &mut InputBuffer<R>,
    flags: &ControlFlags,
    metadata_path: Option<&Path>,
) -> RelayOutcome
where
    S: SourceSession,
    R: AsyncRead + Unpin,
{
    let mut outcome = RelayOutcome::default();

    loop {
        if flags.quit_requested() {
            info!("Quitting ...");
            report_total(outcome.total);
            break;
        }

        let chunk = input.filled();
        outcome.total += chunk.len() as u64;

        if chunk.is_empty() {
            flags.request_quit();
        } else {
            outcome.sends += 1;
            if let Err(e) = session.send(chunk).await {
                error!(
                    error = %e,
                    detail = session.last_error().unwrap_or_default(),
                    "Send error"
                );
                outcome.send_error = Some(e);
                flags.request_quit();
            }
        }

        let quitting = flags.quit_requested();
        if quitting {
            info!("Quitting ...");
            flags.request_report();
        }

        if flags.take_report() {
            report_total(outcome.total);
        }

        if quitting {
            break;
        }

        if flags.take_reload() {
            apply_metadata(metadata_path, session);
        }

        session.sync().await;
        input.fill().await;
    }

    outcome
}
