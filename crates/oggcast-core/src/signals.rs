//! Signal-to-flag bridge.
//!
//! Each listener runs as a tokio task and does nothing but store into
//! [`ControlFlags`]. Work triggered by a signal (printing totals, re-reading
//! the metadata file) happens later in the forward loop.

use std::io;
use std::sync::Arc;

use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::flags::ControlFlags;

/// Effect of a delivered signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Report,
    Quit,
    Reload,
}

impl SignalAction {
    pub fn apply(self, flags: &ControlFlags) {
        match self {
            Self::Report => flags.request_report(),
            Self::Quit => flags.request_quit(),
            Self::Reload => flags.request_reload(),
        }
    }
}

/// Owns the listener tasks; dropping it stops listening.
pub struct SignalBridge {
    flags: Arc<ControlFlags>,
    tasks: Vec<JoinHandle<()>>,
}

impl SignalBridge {
    pub fn new(flags: Arc<ControlFlags>) -> Self {
        Self {
            flags,
            tasks: Vec::new(),
        }
    }

    /// SIGUSR1 requests a metadata reload.
    pub fn install_reload(&mut self) -> io::Result<()> {
        self.listen(SignalKind::user_defined1(), "SIGUSR1", SignalAction::Reload)
    }

    /// SIGHUP requests a report; SIGTERM and SIGINT request quit.
    pub fn install_control(&mut self) -> io::Result<()> {
        self.listen(SignalKind::hangup(), "SIGHUP", SignalAction::Report)?;
        self.listen(SignalKind::terminate(), "SIGTERM", SignalAction::Quit)?;
        self.listen(SignalKind::interrupt(), "SIGINT", SignalAction::Quit)
    }

    fn listen(&mut self, kind: SignalKind, name: &'static str, action: SignalAction) -> io::Result<()> {
        let mut stream = signal(kind)?;
        let flags = Arc::clone(&self.flags);
        self.tasks.push(tokio::spawn(async move {
            while stream.recv().await.is_some() {
                debug!(signal = name, ?action, "Signal received");
                action.apply(&flags);
            }
        }));
        Ok(())
    }
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
