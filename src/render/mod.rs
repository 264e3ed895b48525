//! The external rendering collaborator.
//!
//! Splicing only needs the [`crate::splice::Render`] seam; this module
//! provides the real implementation: a LaTeX/dvipng toolchain driver that
//! rasterizes one fragment to PNG bytes, and an artifact store seam that
//! hands those bytes to the host in exchange for a non-zero id.

pub mod store;
pub mod toolchain;

pub use store::{ArtifactStore, MemoryStore, StoredArtifact};
pub use toolchain::{Toolchain, ToolchainRenderer, search_path, wrap_document};
