// External mapping provider and local cache
//
// The label/format matrix originates from an external documentation
// provider; acquisition details stay behind the MappingSource trait. The
// shipped implementation fetches the serialized matrix over HTTP with
// bounded timeouts. A local cache file round-trips the raw matrix exactly
// as fetched (post-processing happens at table build, not here).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{Result, TagError};

/// Raw label/format matrix: rows keyed by label, columns keyed by format
/// display name, cell = native key
pub type LabelMatrix = BTreeMap<String, BTreeMap<String, String>>;

/// Default location of the serialized matrix
pub const DEFAULT_MAPPING_URL: &str = "https://docs.mp3tag.de/mapping-table/index.json";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider of the label/format matrix
pub trait MappingSource {
    fn fetch(&self) -> Result<LabelMatrix>;
}

/// HTTP provider with bounded connect/read timeouts; a timeout or transport
/// failure surfaces as MappingUnavailable (fatal when no cache exists)
pub struct HttpMappingSource {
    url: String,
    agent: ureq::Agent,
}

impl HttpMappingSource {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(READ_TIMEOUT)
            .build();
        HttpMappingSource {
            url: url.into(),
            agent,
        }
    }
}

impl Default for HttpMappingSource {
    fn default() -> Self {
        Self::new(DEFAULT_MAPPING_URL)
    }
}

impl MappingSource for HttpMappingSource {
    fn fetch(&self) -> Result<LabelMatrix> {
        debug!("fetching mapping matrix from {}", self.url);
        let response = self.agent.get(&self.url).call().map_err(|err| {
            TagError::MappingUnavailable {
                reason: format!("fetch {}: {err}", self.url),
            }
        })?;
        let body = response
            .into_string()
            .map_err(|err| TagError::MappingUnavailable {
                reason: format!("read {}: {err}", self.url),
            })?;
        serde_json::from_str(&body).map_err(|err| TagError::MappingUnavailable {
            reason: format!("parse {}: {err}", self.url),
        })
    }
}

/// Read a previously cached matrix; a missing, unreadable or empty cache
/// yields None so the caller falls back to the remote source
pub fn load_cache(path: &Path) -> Option<LabelMatrix> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(err) => {
            debug!("mapping cache '{}' not usable: {err}", path.display());
            return None;
        }
    };
    let matrix: LabelMatrix = match serde_json::from_str(&body) {
        Ok(matrix) => matrix,
        Err(err) => {
            warn!("mapping cache '{}' is malformed: {err}", path.display());
            return None;
        }
    };
    if matrix.is_empty() {
        return None;
    }
    debug!("loaded mapping matrix from cache '{}'", path.display());
    Some(matrix)
}

/// Persist a freshly fetched matrix for future runs
pub fn store_cache(path: &Path, matrix: &LabelMatrix) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let body = serde_json::to_string_pretty(matrix).map_err(std::io::Error::other)?;
    fs::write(path, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tagbridge-source-{}-{name}", std::process::id()))
    }

    fn sample_json() -> String {
        serde_json::to_string(&crate::mapping::test_matrix::sample()).unwrap()
    }

    #[test]
    fn test_fetch_parses_matrix() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/mapping.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(sample_json())
            .create();

        let source = HttpMappingSource::new(format!("{}/mapping.json", server.url()));
        let matrix = source.fetch().unwrap();
        assert!(matrix.contains_key("TITLE"));
        mock.assert();
    }

    #[test]
    fn test_fetch_failure_is_mapping_unavailable() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/mapping.json")
            .with_status(500)
            .create();

        let source = HttpMappingSource::new(format!("{}/mapping.json", server.url()));
        let err = source.fetch().unwrap_err();
        assert!(matches!(err, TagError::MappingUnavailable { .. }));
    }

    #[test]
    fn test_cache_round_trips_exactly() {
        let path = temp_path("cache.json");
        let matrix = crate::mapping::test_matrix::sample();
        store_cache(&path, &matrix).unwrap();
        let reloaded = load_cache(&path).unwrap();
        assert_eq!(reloaded, matrix);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_cache_is_none() {
        assert!(load_cache(&temp_path("does-not-exist.json")).is_none());
    }

    #[test]
    fn test_malformed_cache_is_none() {
        let path = temp_path("bad-cache.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_cache(&path).is_none());
        let _ = fs::remove_file(&path);
    }
}
