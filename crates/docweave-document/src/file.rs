// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File handle: the raw bytes manipulators operate on.

use std::fmt;
use std::path::{Path, PathBuf};

use docweave_core::error::Result;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

/// Owned document contents, optionally tied to the path they came from.
///
/// Manipulators receive `&File` and return fresh `File`s; a `File` is never
/// modified after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct File {
    contents: Vec<u8>,
    path: Option<PathBuf>,
}

impl File {
    /// Wrap bytes already in memory.
    pub fn from_bytes(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            path: None,
        }
    }

    /// Read a file from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = std::fs::read(path_ref)?;
        debug!(bytes_len = contents.len(), "File read");

        Ok(Self {
            contents,
            path: Some(path_ref.to_path_buf()),
        })
    }

    /// Write the contents to `path` and return a handle tied to that path.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), bytes_len = self.contents.len()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path_ref, &self.contents)?;
        info!("Wrote {}", path_ref.display());

        Ok(Self {
            contents: self.contents.clone(),
            path: Some(path_ref.to_path_buf()),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.contents
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.contents
    }

    /// Path the file was read from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Lowercase hex SHA-256 of the contents.
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.contents);
        hex::encode(hasher.finalize())
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("len", &self.contents.len())
            .field("path", &self.path)
            .finish()
    }
}

impl From<Vec<u8>> for File {
    fn from(contents: Vec<u8>) -> Self {
        Self::from_bytes(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn bytes_round_trip_unchanged() {
        let raw = vec![0u8, 1, 2, 255, b'%', b'P'];
        let file = File::from_bytes(raw.clone());
        assert_eq!(file.bytes(), raw.as_slice());
        assert_eq!(file.into_bytes(), raw);
    }

    #[test]
    fn checksum_matches_known_values() {
        assert_eq!(File::from_bytes(Vec::new()).checksum(), EMPTY_SHA256);
        assert_eq!(
            File::from_bytes(b"hello".to_vec()).checksum(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn save_then_open_preserves_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.pdf");

        let saved = File::from_bytes(b"%PDF-1.5 body".to_vec()).save(&path).unwrap();
        assert_eq!(saved.path(), Some(path.as_path()));

        let reopened = File::open(&path).unwrap();
        assert_eq!(reopened.bytes(), b"%PDF-1.5 body");
        assert_eq!(reopened, saved);
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = File::open(dir.path().join("absent.rtf")).unwrap_err();
        assert!(matches!(err, docweave_core::DocweaveError::Io(_)));
    }
}
