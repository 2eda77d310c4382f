//! Versioned Artifact Envelope

use crate::StorageError;
use chrono::{DateTime, Utc};
use feature_engine::FittedTransformer;
use model_search::SearchResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Leading bytes of every artifact file
pub const MAGIC: [u8; 4] = *b"GRDP";

/// Bumped whenever a persisted type changes shape
pub const FORMAT_VERSION: u16 = 1;

/// What an artifact file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Preprocessor,
    SearchResult,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Preprocessor => "preprocessor",
            ArtifactKind::SearchResult => "search_result",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be persisted as an artifact
pub trait Artifact: Serialize + DeserializeOwned {
    const KIND: ArtifactKind;
}

impl Artifact for FittedTransformer {
    const KIND: ArtifactKind = ArtifactKind::Preprocessor;
}

impl Artifact for SearchResult {
    const KIND: ArtifactKind = ArtifactKind::SearchResult;
}

/// Metadata stored ahead of the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub magic: [u8; 4],
    pub format_version: u16,
    pub kind: ArtifactKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    header: ArtifactHeader,
    payload: Vec<u8>,
}

/// Serialize a value inside a fresh envelope
pub fn encode_artifact<T: Artifact>(value: &T) -> Result<Vec<u8>, StorageError> {
    let envelope = Envelope {
        header: ArtifactHeader {
            magic: MAGIC,
            format_version: FORMAT_VERSION,
            kind: T::KIND,
            created_at: Utc::now(),
        },
        payload: postcard::to_allocvec(value)?,
    };
    Ok(postcard::to_allocvec(&envelope)?)
}

/// Check the envelope and deserialize its payload
pub fn decode_artifact<T: Artifact>(bytes: &[u8]) -> Result<(ArtifactHeader, T), StorageError> {
    if !bytes.starts_with(&MAGIC) {
        return Err(StorageError::BadMagic);
    }
    let envelope: Envelope = postcard::from_bytes(bytes)?;
    let header = envelope.header;
    if header.format_version != FORMAT_VERSION {
        return Err(StorageError::VersionMismatch {
            expected: FORMAT_VERSION,
            found: header.format_version,
        });
    }
    if header.kind != T::KIND {
        return Err(StorageError::KindMismatch {
            expected: T::KIND,
            found: header.kind,
        });
    }
    let value = postcard::from_bytes(&envelope.payload)?;
    Ok((header, value))
}

/// Write an artifact file, creating parent directories as needed
pub fn save_artifact<T: Artifact>(path: impl AsRef<Path>, value: &T) -> Result<(), StorageError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let bytes = encode_artifact(value)?;
    fs::write(path, &bytes)?;
    info!("Saved {} artifact to {} ({} bytes)", T::KIND, path.display(), bytes.len());
    Ok(())
}

/// Read an artifact file written by [`save_artifact`]
pub fn load_artifact<T: Artifact>(path: impl AsRef<Path>) -> Result<T, StorageError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let (header, value) = decode_artifact(&bytes)?;
    debug!(
        "Loaded {} artifact from {} (created {})",
        header.kind,
        path.display(),
        header.created_at
    );
    Ok(value)
}
