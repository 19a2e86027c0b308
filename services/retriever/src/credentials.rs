//! Archive credentials.
//!
//! The URL and API key come from command-line flags or the `CDSAPI_URL` /
//! `CDSAPI_KEY` environment variables, falling back to a `.cdsapirc` file:
//!
//! ```yaml
//! url: https://cds.climate.copernicus.eu/api
//! key: 00000000-0000-0000-0000-000000000000
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{RetrieveError, RetrieveResult};

/// Default archive API endpoint.
pub const DEFAULT_API_URL: &str = "https://cds.climate.copernicus.eu/api";

/// Endpoint and API key for the archive.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Values found in a `.cdsapirc` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcFile {
    pub url: Option<String>,
    pub key: Option<String>,
}

impl RcFile {
    /// Parse the `key: value` lines of a `.cdsapirc` file.
    pub fn parse(contents: &str) -> RetrieveResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let mapping: Mapping = serde_yaml::from_str(contents)
            .map_err(|e| RetrieveError::Config(format!("malformed .cdsapirc: {}", e)))?;
        Ok(Self {
            url: scalar(&mapping, "url"),
            key: scalar(&mapping, "key"),
        })
    }

    /// Read and parse `path`.
    pub fn load(path: &Path) -> RetrieveResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RetrieveError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }
}

/// Scalar value under `key` as a string; YAML may type keys as numbers.
fn scalar(mapping: &Mapping, key: &str) -> Option<String> {
    match mapping.get(key)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
    .filter(|s| !s.is_empty())
}

/// `~/.cdsapirc`, if a home directory is known.
pub fn default_rc_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cdsapirc"))
}

impl Credentials {
    /// Resolve credentials from explicit values and an optional rc file.
    ///
    /// An explicitly named rc file must exist; the default `~/.cdsapirc` is
    /// only read when present. Explicit values win over the file.
    pub fn resolve(
        url: Option<String>,
        key: Option<String>,
        rc_file: Option<&Path>,
    ) -> RetrieveResult<Self> {
        let url = url.filter(|s| !s.trim().is_empty());
        let key = key.filter(|s| !s.trim().is_empty());

        let rc = if url.is_some() && key.is_some() {
            RcFile::default()
        } else {
            match rc_file {
                Some(path) => RcFile::load(path)?,
                None => match default_rc_path() {
                    Some(path) if path.exists() => {
                        debug!(path = %path.display(), "Reading archive credentials");
                        RcFile::load(&path)?
                    }
                    _ => RcFile::default(),
                },
            }
        };

        let key = key.or(rc.key).ok_or_else(|| {
            RetrieveError::Config(
                "no archive API key; set CDSAPI_KEY or add 'key:' to ~/.cdsapirc".to_string(),
            )
        })?;
        let url = url
            .or(rc.url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rc_file() {
        let rc = RcFile::parse(
            "url: https://cds.climate.copernicus.eu/api\nkey: abcd-1234\n",
        )
        .unwrap();
        assert_eq!(rc.url.as_deref(), Some("https://cds.climate.copernicus.eu/api"));
        assert_eq!(rc.key.as_deref(), Some("abcd-1234"));
    }

    #[test]
    fn test_parse_rc_numeric_key() {
        let rc = RcFile::parse("key: 123456\n").unwrap();
        assert_eq!(rc.key.as_deref(), Some("123456"));
        assert_eq!(rc.url, None);
    }

    #[test]
    fn test_parse_rc_rejects_garbage() {
        assert!(RcFile::parse("key: [unterminated").is_err());
        assert_eq!(RcFile::parse("").unwrap(), RcFile::default());
    }

    #[test]
    fn test_explicit_values_win() {
        let dir = tempfile::tempdir().unwrap();
        let rc_path = dir.path().join("rc");
        std::fs::write(&rc_path, "url: https://other.example/api\nkey: from-file\n").unwrap();

        let creds = Credentials::resolve(
            Some("https://example.test/api/".to_string()),
            Some("from-flag".to_string()),
            Some(&rc_path),
        )
        .unwrap();
        assert_eq!(creds.url, "https://example.test/api");
        assert_eq!(creds.key, "from-flag");
    }

    #[test]
    fn test_rc_file_fills_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let rc_path = dir.path().join("rc");
        std::fs::write(&rc_path, "key: from-file\n").unwrap();

        let creds = Credentials::resolve(None, None, Some(&rc_path)).unwrap();
        assert_eq!(creds.url, DEFAULT_API_URL);
        assert_eq!(creds.key, "from-file");
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let rc_path = dir.path().join("rc");
        std::fs::write(&rc_path, "url: https://example.test/api\n").unwrap();

        let err = Credentials::resolve(None, None, Some(&rc_path)).unwrap_err();
        assert!(matches!(err, RetrieveError::Config(_)));
    }

    #[test]
    fn test_named_rc_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::resolve(None, None, Some(&dir.path().join("absent"))).unwrap_err();
        assert!(matches!(err, RetrieveError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let creds = Credentials {
            url: DEFAULT_API_URL.to_string(),
            key: "secret".to_string(),
        };
        assert!(!format!("{:?}", creds).contains("secret"));
    }
}
