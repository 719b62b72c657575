//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use oggcast_core::config::check_argument_len;
#[cfg(feature = "tls")]
use oggcast_core::TlsMode;
use oggcast_core::SessionConfig;

const USAGE: &str = "oggcast [-hp] [-T mode] [-m metafile] [-d desc] [-g genre] [-n name] [-u url] address port password mountpoint";

/// Option argument capped at the maximum argument length.
fn bounded<const FLAG: char>(value: &str) -> Result<String, String> {
    check_argument_len(FLAG, value).map_err(|e| e.to_string())?;
    Ok(value.to_string())
}

fn metafile(value: &str) -> Result<PathBuf, String> {
    bounded::<'m'>(value).map(PathBuf::from)
}

#[cfg(feature = "tls")]
fn tls_mode(value: &str) -> Result<TlsMode, String> {
    bounded::<'T'>(value)?.parse().map_err(|e: oggcast_core::Error| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "oggcast")]
#[command(
    version,
    about = "Forward an Ogg stream from standard input to an Icecast server",
    override_usage = USAGE,
    disable_help_flag = true
)]
pub struct Cli {
    /// Print usage.
    #[arg(short = 'h', action = ArgAction::Help)]
    help: Option<bool>,

    /// List the stream in public directories.
    #[arg(short = 'p', overrides_with = "public")]
    pub public: bool,

    /// TLS mode: disabled, auto, auto_no_plain, rfc2818 or rfc2817.
    #[cfg(feature = "tls")]
    #[arg(short = 'T', value_name = "mode", value_parser = tls_mode)]
    pub tls: Option<TlsMode>,

    /// Metadata file, re-read on SIGUSR1.
    #[arg(short = 'm', value_name = "metafile", value_parser = metafile)]
    pub metafile: Option<PathBuf>,

    /// Stream description.
    #[arg(short = 'd', value_name = "desc", value_parser = bounded::<'d'>)]
    pub description: Option<String>,

    /// Stream genre.
    #[arg(short = 'g', value_name = "genre", value_parser = bounded::<'g'>)]
    pub genre: Option<String>,

    /// Stream name.
    #[arg(short = 'n', value_name = "name", value_parser = bounded::<'n'>)]
    pub name: Option<String>,

    /// Stream URL.
    #[arg(short = 'u', value_name = "url", value_parser = bounded::<'u'>)]
    pub url: Option<String>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "OGGCAST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, env = "OGGCAST_LOG_JSON")]
    pub log_json: bool,

    /// Icecast server address.
    pub address: String,

    /// Icecast server port.
    pub port: u16,

    /// Source password.
    pub password: String,

    /// Mountpoint, e.g. /live.ogg.
    pub mountpoint: String,
}

impl Cli {
    pub fn into_config(self) -> SessionConfig {
        let mut config = SessionConfig::new(self.address, self.port, self.password, self.mountpoint);
        config.public = self.public;
        #[cfg(feature = "tls")]
        if let Some(mode) = self.tls {
            config.tls = mode;
        }
        #[cfg(not(feature = "tls"))]
        {
            config.tls = oggcast_core::TlsMode::Disabled;
        }
        config.metadata_path = self.metafile;
        config.description = self.description;
        config.genre = self.genre;
        config.name = self.name;
        config.url = self.url;
        config
    }
}
