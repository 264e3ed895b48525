//! Artifact store seam.
//!
//! The host owns rendered images; the pipeline only ever holds the ids it
//! embeds into message buffers. [`MemoryStore`] is the in-process
//! implementation used by the CLI host and tests.

use crate::error::RenderError;
use crate::splice::ArtifactId;

/// Host-side image store.
///
/// Implementations take ownership of rendered image bytes and return a
/// non-zero artifact id. A store that cannot accept the image reports
/// [`RenderError::StoreRejected`], which the splicer treats like any other
/// per-fragment render failure.
pub trait ArtifactStore {
    /// Registers one rendered image and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::StoreRejected`] (or an I/O variant) if the
    /// image cannot be registered.
    fn store(&mut self, name: &str, png: Vec<u8>) -> Result<ArtifactId, RenderError>;
}

/// One artifact held by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// Assigned artifact id.
    pub id: ArtifactId,
    /// File name the artifact was registered under.
    pub name: String,
    /// PNG image bytes.
    pub bytes: Vec<u8>,
}

/// In-memory artifact store with sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    artifacts: Vec<StoredArtifact>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            artifacts: Vec::new(),
        }
    }

    /// Returns all stored artifacts in registration order.
    #[must_use]
    pub fn artifacts(&self) -> &[StoredArtifact] {
        &self.artifacts
    }

    /// Looks up an artifact by id.
    #[must_use]
    pub fn get(&self, id: ArtifactId) -> Option<&StoredArtifact> {
        self.artifacts.iter().find(|a| a.id == id)
    }

    /// Returns the number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns `true` if the store holds no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactStore for MemoryStore {
    fn store(&mut self, name: &str, png: Vec<u8>) -> Result<ArtifactId, RenderError> {
        if png.is_empty() {
            return Err(RenderError::StoreRejected);
        }

        #[allow(clippy::cast_possible_truncation)]
        let next = self.artifacts.len() as u32 + 1;
        let id = ArtifactId::new(next).ok_or(RenderError::StoreRejected)?;

        self.artifacts.push(StoredArtifact {
            id,
            name: name.to_string(),
            bytes: png,
        });
        Ok(id)
    }
}
