//! Control flags shared between signal listeners and the forward loop.

use std::sync::atomic::{AtomicBool, Ordering};

/// Requests raised asynchronously and consumed by the forward loop.
///
/// `quit` is terminal: once set it stays set. `report` and `reload` are
/// cleared when the loop takes them.
#[derive(Debug, Default)]
pub struct ControlFlags {
    report: AtomicBool,
    quit: AtomicBool,
    reload: AtomicBool,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to print the running byte total.
    pub fn request_report(&self) {
        self.report.store(true, Ordering::SeqCst);
    }

    /// Ask the loop to stop at the next iteration boundary.
    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    /// Ask the loop to re-read the metadata file.
    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    /// Consume a pending report request.
    pub fn take_report(&self) -> bool {
        self.report.swap(false, Ordering::SeqCst)
    }

    /// Consume a pending reload request.
    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear() {
        let flags = ControlFlags::new();
        assert!(!flags.quit_requested());
        assert!(!flags.take_report());
        assert!(!flags.take_reload());
    }

    #[test]
    fn report_is_consumed_once() {
        let flags = ControlFlags::new();
        flags.request_report();
        flags.request_report();
        assert!(flags.take_report());
        assert!(!flags.take_report());
    }

    #[test]
    fn reload_is_consumed_once() {
        let flags = ControlFlags::new();
        flags.request_reload();
        assert!(flags.take_reload());
        assert!(!flags.take_reload());
    }

    #[test]
    fn quit_is_terminal() {
        let flags = ControlFlags::new();
        flags.request_quit();
        assert!(flags.quit_requested());
        assert!(!flags.take_report());
        assert!(flags.quit_requested());
    }
}
