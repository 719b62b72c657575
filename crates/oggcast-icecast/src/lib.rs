//! Icecast source session for `oggcast`.
//!
//! [`IcecastSession`] implements [`SourceSession`](oggcast_core::SourceSession)
//! on top of libshout through the `shout` crate. The handshake, authentication
//! and real-time pacing all happen inside libshout.

pub mod session;

pub use session::IcecastSession;
