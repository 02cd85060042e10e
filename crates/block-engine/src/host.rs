//! Host collaborator interfaces.
//!
//! Persistence and object storage live outside the engine. The engine never
//! calls these traits itself: on submit, host code reads the session's block
//! snapshot and hands it to its [`DocumentStore`]; media blocks get their
//! upload URLs from the host's [`ObjectStore`] before their object key lands
//! in block content. They are declared here so hosts and tests share one
//! vocabulary for the boundary.

use crate::block::Block;
use std::fmt;

/// Opaque failure reported by a host collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(String);

impl HostError {
    /// Wrap a collaborator failure message.
    pub fn new(message: impl Into<String>) -> Self {
        HostError(message.into())
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for HostError {}

/// Persists whole documents. Implemented by the host.
pub trait DocumentStore {
    /// Persist the block list as one document; returns on acknowledgement.
    fn save_document(&mut self, blocks: &[Block]) -> Result<(), HostError>;
}

/// Issues signed upload URLs for media artifacts. Implemented by the host.
pub trait ObjectStore {
    /// Obtain a signed URL for uploading `key` with the given content type.
    fn generate_upload_url(&mut self, key: &str, content_type: &str)
    -> Result<String, HostError>;
}
