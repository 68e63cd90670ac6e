//! Manifest entries and the URL path-segment parser.
//!
//! Artifact identities are derived from fixed positional segments of the
//! manifest file URL. The offsets below are a compatibility contract with the
//! manifest source's URL scheme
//! (`https://<host>/resource/<resource-id>/data/contents/<path...>/<file>`)
//! and must not change: layers registered under one scheme become
//! unreachable under another.

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// First segment of the resource-relative storage path
/// (`<resource-id>/data/contents/...`), counting from the URL scheme.
pub const STORAGE_PATH_OFFSET: usize = 4;

/// First segment of the identity path (the aggregation folder below
/// `contents/`).
pub const IDENTITY_OFFSET: usize = 7;

/// One file entry from the resource's manifest listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    pub logical_file_type: String,
    pub content_type: String,
    pub url: String,
}

/// Wire shape of the manifest source's file listing body.
#[derive(Debug, Deserialize)]
pub struct FileListing {
    pub results: Vec<ManifestEntry>,
}

/// A manifest URL decomposed into `/`-separated segments.
///
/// The split is over the whole URL, scheme included, so the named offsets
/// above line up with the manifest source's URL layout. Derivations are
/// deterministic: a fixed URL always yields byte-identical identity, storage
/// path and file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPath {
    segments: Vec<String>,
}

impl ManifestPath {
    /// Split a manifest URL into segments.
    ///
    /// Fails when the URL is too short to carry an identity and a file name,
    /// which callers treat as "not a publishable artifact".
    pub fn parse(url: &str) -> Result<Self> {
        let segments: Vec<String> = url.split('/').map(str::to_owned).collect();
        if segments.len() <= IDENTITY_OFFSET {
            return Err(CoreError::invalid_manifest_url(url));
        }
        Ok(Self { segments })
    }

    /// Identity segments: everything between the contents root and the file
    /// name. For a file directly under `contents/` this is empty.
    fn identity_segments(&self) -> &[String] {
        &self.segments[IDENTITY_OFFSET..self.segments.len() - 1]
    }

    /// Geospatial layer identity: identity segments joined by a space.
    pub fn layer_identity(&self) -> String {
        self.identity_segments().join(" ")
    }

    /// Time-series database identity: identity segments joined by `/`.
    pub fn database_identity(&self) -> String {
        self.identity_segments().join("/")
    }

    /// Resource-relative storage path (`<resource-id>/data/contents/...`).
    pub fn storage_path(&self) -> String {
        self.segments[STORAGE_PATH_OFFSET..].join("/")
    }

    /// Final URL segment (the file name, extension included).
    pub fn file_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// File name with the final extension removed.
    pub fn file_stem(&self) -> String {
        match self.file_name().rsplit_once('.') {
            Some((stem, _)) => stem.to_owned(),
            None => String::new(),
        }
    }

    /// Text after the final `.` of the file name; the whole name when there
    /// is no extension. Matched byte-exactly against the recognized kinds.
    pub fn extension(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => name,
        }
    }
}
