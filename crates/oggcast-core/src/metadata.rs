//! Stream metadata file loader.
//!
//! The file is plain text with one `key=value` pair per line:
//!
//! ```text
//! # shown in directory listings
//! name=Night Shift
//! genre=ambient
//! description=Live from the basement
//! url=https://radio.example.org
//! ```
//!
//! Only the first [`METADATA_BUFFER_SIZE`] bytes of the file are read. A line
//! cut by that limit, or any last line without a terminator, has no effect.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::session::{SessionSetting, SourceSession};

/// Number of bytes read from the metadata file per load.
pub const METADATA_BUFFER_SIZE: usize = 4096;

/// Keys understood in the metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Name,
    Genre,
    Description,
    Url,
}

impl MetadataField {
    fn from_key(key: &[u8]) -> Option<Self> {
        match key {
            b"name" => Some(Self::Name),
            b"genre" => Some(Self::Genre),
            b"description" => Some(Self::Description),
            b"url" => Some(Self::Url),
            _ => None,
        }
    }

    pub fn into_setting(self, value: String) -> SessionSetting {
        match self {
            Self::Name => SessionSetting::Name(value),
            Self::Genre => SessionSetting::Genre(value),
            Self::Description => SessionSetting::Description(value),
            Self::Url => SessionSetting::Url(value),
        }
    }
}

/// One recognised `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub field: MetadataField,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Unknown,
    Key,
    Value,
    Comment,
}

/// Scan a metadata buffer and return the recognised entries in file order.
///
/// A NUL byte ends the scan. `#` starts a comment only as the first byte of a
/// line; the first `=` of a line ends the key; everything up to the line
/// terminator is the value (possibly empty). Unknown keys are skipped.
pub fn parse_metadata(buf: &[u8]) -> Vec<MetadataEntry> {
    let buf = &buf[..buf.len().min(METADATA_BUFFER_SIZE)];
    let mut entries = Vec::new();
    let mut state = ScanState::Unknown;
    let mut key_start = 0;
    let mut key_end = 0;

    for (i, &byte) in buf.iter().enumerate() {
        match byte {
            0 => break,
            b'\r' | b'\n' => {
                if state == ScanState::Value {
                    if let Some(field) = MetadataField::from_key(&buf[key_start..key_end]) {
                        let value = String::from_utf8_lossy(&buf[key_end + 1..i]).into_owned();
                        entries.push(MetadataEntry { field, value });
                    }
                }
                state = ScanState::Unknown;
            }
            b'=' => {
                if state == ScanState::Key {
                    key_end = i;
                    state = ScanState::Value;
                }
            }
            b'#' => {
                if state == ScanState::Unknown {
                    state = ScanState::Comment;
                }
            }
            _ => {
                if state == ScanState::Unknown {
                    key_start = i;
                    state = ScanState::Key;
                }
            }
        }
    }

    entries
}

/// Read at most [`METADATA_BUFFER_SIZE`] bytes of `path` and parse them.
pub fn read_metadata_file(path: &Path) -> Result<Vec<MetadataEntry>> {
    let file = File::open(path).map_err(|e| {
        Error::Metadata(format!(
            "Error while opening meta file \"{}\": {e}",
            path.display()
        ))
    })?;

    let mut buf = Vec::with_capacity(METADATA_BUFFER_SIZE);
    file.take(METADATA_BUFFER_SIZE as u64)
        .read_to_end(&mut buf)
        .map_err(|e| {
            Error::Metadata(format!(
                "Error while reading meta file \"{}\": {e}",
                path.display()
            ))
        })?;

    Ok(parse_metadata(&buf))
}

/// Load the metadata file and push every recognised field into `session`.
///
/// Never fails: a missing path or an unreadable file is logged and nothing
/// changes. Returns the number of fields the session accepted.
pub fn apply_metadata<S: SourceSession>(path: Option<&Path>, session: &mut S) -> usize {
    let Some(path) = path else {
        warn!("No metadata file configured; use -m to set one");
        return 0;
    };

    let entries = match read_metadata_file(path) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Metadata not loaded");
            return 0;
        }
    };

    let mut applied = 0;
    for entry in entries {
        let setting = entry.field.into_setting(entry.value);
        let field = setting.field();
        match session.set(setting) {
            Ok(()) => {
                debug!(field, "Metadata field applied");
                applied += 1;
            }
            Err(e) => warn!(field, error = %e, "Session rejected metadata field"),
        }
    }

    info!(path = %path.display(), applied, "Metadata loaded");
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(field: MetadataField, value: &str) -> MetadataEntry {
        MetadataEntry {
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn parses_known_keys() {
        let entries = parse_metadata(
            b"name=Night Shift\ngenre=ambient\ndescription=Live\nurl=https://example.org\n",
        );
        assert_eq!(
            entries,
            vec![
                entry(MetadataField::Name, "Night Shift"),
                entry(MetadataField::Genre, "ambient"),
                entry(MetadataField::Description, "Live"),
                entry(MetadataField::Url, "https://example.org"),
            ]
        );
    }

    #[test]
    fn skips_comments_and_unknown_keys() {
        let entries = parse_metadata(b"# name=ignored\nbitrate=128\nname=kept\n");
        assert_eq!(entries, vec![entry(MetadataField::Name, "kept")]);
    }

    #[test]
    fn hash_inside_key_or_value_is_literal() {
        let entries = parse_metadata(b"name=track #4\nna#me=x\n");
        assert_eq!(entries, vec![entry(MetadataField::Name, "track #4")]);
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let entries = parse_metadata(b"url=https://example.org/?a=b\n");
        assert_eq!(
            entries,
            vec![entry(MetadataField::Url, "https://example.org/?a=b")]
        );
    }

    #[test]
    fn empty_value_is_applied() {
        let entries = parse_metadata(b"genre=\n");
        assert_eq!(entries, vec![entry(MetadataField::Genre, "")]);
    }

    #[test]
    fn keys_are_matched_exactly() {
        assert!(parse_metadata(b" name=x\nName=x\nname =x\n").is_empty());
    }

    #[test]
    fn line_without_equals_is_ignored() {
        let entries = parse_metadata(b"name\n=genre\ngenre=rock\n");
        assert_eq!(entries, vec![entry(MetadataField::Genre, "rock")]);
    }

    #[test]
    fn crlf_terminated_lines() {
        let entries = parse_metadata(b"name=a\r\ngenre=b\r\n");
        assert_eq!(
            entries,
            vec![
                entry(MetadataField::Name, "a"),
                entry(MetadataField::Genre, "b"),
            ]
        );
    }

    #[test]
    fn unterminated_last_line_is_dropped() {
        let entries = parse_metadata(b"name=a\ngenre=b");
        assert_eq!(entries, vec![entry(MetadataField::Name, "a")]);
    }

    #[test]
    fn nul_byte_ends_scan() {
        let entries = parse_metadata(b"name=a\n\0genre=b\n");
        assert_eq!(entries, vec![entry(MetadataField::Name, "a")]);
    }

    #[test]
    fn content_past_buffer_size_is_ignored() {
        let mut buf = vec![b'#'; METADATA_BUFFER_SIZE - 1];
        buf.push(b'\n');
        buf.extend_from_slice(b"name=too late\n");
        assert!(parse_metadata(&buf).is_empty());
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let err = read_metadata_file(Path::new("/nonexistent/oggcast.meta")).unwrap_err();
        assert!(matches!(err, Error::Metadata(_)));
        assert!(err.to_string().contains("/nonexistent/oggcast.meta"));
    }

    #[test]
    fn read_truncates_long_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("meta.txt");
        let mut content = String::from("name=first\n");
        content.push_str(&"x".repeat(METADATA_BUFFER_SIZE));
        content.push_str("\ngenre=never\n");
        std::fs::write(&path, content).unwrap();

        let entries = read_metadata_file(&path).unwrap();
        assert_eq!(entries, vec![entry(MetadataField::Name, "first")]);
    }
}
