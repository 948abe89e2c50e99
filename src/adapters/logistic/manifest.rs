//! SHA-256 digest manifest for exported model files.
//!
//! `manifest.json` sits next to the model and binds each file name to the
//! hex digest of its bytes:
//!
//! ```json
//! { "version": 1, "files": { "model.json": "9f86d081..." } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::ModelLoadError;

/// File name of the manifest inside the model directory.
pub const MANIFEST_FILE: &str = "manifest.json";

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ModelManifest {
    /// Digest every file in `files` (relative to `dir`).
    ///
    /// # Errors
    /// Returns error if a file cannot be read.
    pub fn for_files(dir: &Path, files: &[String]) -> Result<Self, ModelLoadError> {
        let mut digests = BTreeMap::new();
        for rel in files {
            let path = dir.join(rel);
            let bytes = fs::read(&path).map_err(|source| ModelLoadError::Io {
                path: path.clone(),
                source,
            })?;
            digests.insert(rel.clone(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files: digests,
        })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    /// Returns error on I/O failure, malformed JSON, or an unsupported version.
    pub fn read(path: &Path) -> Result<Self, ModelLoadError> {
        let content = fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: Self = serde_json::from_slice(&content)
            .map_err(|e| ModelLoadError::Manifest(format!("Invalid manifest.json format: {e}")))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ModelLoadError::Manifest(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }
        Ok(manifest)
    }

    /// Write the manifest as pretty JSON.
    ///
    /// # Errors
    /// Returns error on serialization or I/O failure.
    pub fn write(&self, path: &Path) -> Result<(), ModelLoadError> {
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| ModelLoadError::Manifest(format!("Failed to serialize manifest: {e}")))?;
        fs::write(path, bytes).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check that `file` is listed and its bytes match the recorded digest.
    ///
    /// # Errors
    /// Returns `ModelLoadError::Manifest` if the file is not listed and
    /// `ModelLoadError::DigestMismatch` if the digest differs.
    pub fn verify(&self, file: &str, bytes: &[u8]) -> Result<(), ModelLoadError> {
        let expected = self.files.get(file).ok_or_else(|| {
            ModelLoadError::Manifest(format!("manifest.json does not include {file}"))
        })?;
        if !expected.eq_ignore_ascii_case(&sha256_hex(bytes)) {
            return Err(ModelLoadError::DigestMismatch(file.to_string()));
        }
        Ok(())
    }
}

/// Manifest path for a model file.
#[must_use]
pub fn manifest_path_for(model_path: &Path) -> PathBuf {
    model_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(MANIFEST_FILE)
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(b"test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_manifest_write_read_verify() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("model.json"), b"{}").expect("write model");

        let manifest = ModelManifest::for_files(temp.path(), &["model.json".to_string()])
            .expect("Should digest files");
        let path = temp.path().join(MANIFEST_FILE);
        manifest.write(&path).expect("Should write manifest");

        let loaded = ModelManifest::read(&path).expect("Should read manifest");
        assert_eq!(loaded, manifest);
        loaded.verify("model.json", b"{}").expect("Digest should match");
        assert!(matches!(
            loaded.verify("model.json", b"{ }"),
            Err(ModelLoadError::DigestMismatch(_))
        ));
        assert!(matches!(
            loaded.verify("other.json", b"{}"),
            Err(ModelLoadError::Manifest(_))
        ));
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(&path, r#"{"version": 2, "files": {}}"#).expect("write");
        assert!(matches!(
            ModelManifest::read(&path),
            Err(ModelLoadError::Manifest(_))
        ));
    }

    #[test]
    fn test_manifest_path_for() {
        assert_eq!(
            manifest_path_for(Path::new("models/model.json")),
            PathBuf::from("models/manifest.json")
        );
    }
}
