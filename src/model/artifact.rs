use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {} ({backend}): {source}", path.display())]
    Decode {
        path: PathBuf,
        backend: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("inconsistent artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactError {
    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactError::Missing(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactBackend {
    GzipJson,
    Json,
}

/// Tried in order; the first backend that accepts the bytes decodes them.
pub const BACKENDS: [ArtifactBackend; 2] = [ArtifactBackend::GzipJson, ArtifactBackend::Json];

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

impl ArtifactBackend {
    pub fn name(self) -> &'static str {
        match self {
            ArtifactBackend::GzipJson => "gzip+json",
            ArtifactBackend::Json => "json",
        }
    }

    fn accepts(self, bytes: &[u8]) -> bool {
        match self {
            ArtifactBackend::GzipJson => bytes.starts_with(&GZIP_MAGIC),
            ArtifactBackend::Json => true,
        }
    }

    fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, serde_json::Error> {
        match self {
            ArtifactBackend::GzipJson => serde_json::from_reader(GzDecoder::new(bytes)),
            ArtifactBackend::Json => serde_json::from_slice(bytes),
        }
    }
}

pub fn select_backend(bytes: &[u8]) -> ArtifactBackend {
    BACKENDS
        .iter()
        .copied()
        .find(|b| b.accepts(bytes))
        .unwrap_or(ArtifactBackend::Json)
}

pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ArtifactError::Missing(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let backend = select_backend(&bytes);
    tracing::debug!(
        path = %path.display(),
        backend = backend.name(),
        bytes = bytes.len(),
        "decoding artifact"
    );
    backend
        .decode(&bytes)
        .map_err(|source| ArtifactError::Decode {
            path: path.to_path_buf(),
            backend: backend.name(),
            source,
        })
}

/// A missing file is `Ok(None)`; any other failure is an error.
pub fn load_optional_artifact<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, ArtifactError> {
    match load_artifact(path) {
        Ok(v) => Ok(Some(v)),
        Err(ArtifactError::Missing(_)) => Ok(None),
        Err(err) => Err(err),
    }
}
