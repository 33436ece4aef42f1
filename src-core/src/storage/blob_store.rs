//! Content-addressed photo storage
//!
//! Photo bytes are stored under their SHA-256 hash in a two-level directory
//! layout, e.g. hash "abcd1234..." lives at "blobs/ab/cd/abcd1234...".
//! Identical photos share one blob.

use crate::error::{AppError, Result};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Content-addressed blob store
#[derive(Clone)]
pub struct BlobStore {
    root: PathBuf,
}

/// SHA-256 hex digest of `data`
pub fn content_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn is_valid_hash(hash: &str) -> bool {
    hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

impl BlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if needed
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Photo store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Store `data` and return its hash. Existing blobs are not rewritten.
    pub async fn write(&self, data: &[u8]) -> Result<String> {
        let hash = content_hash(data);
        let path = self.path_for(&hash)?;

        if fs::try_exists(&path).await? {
            tracing::debug!("Blob already stored: {}", hash);
            return Ok(hash);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write beside the target, then rename into place
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &path).await?;

        tracing::debug!("Wrote blob: {} ({} bytes)", hash, data.len());

        Ok(hash)
    }

    /// Read a blob's bytes
    pub async fn read(&self, hash: &str) -> Result<Vec<u8>> {
        let path = self.path_for(hash)?;

        if !fs::try_exists(&path).await? {
            return Err(AppError::BlobStore(format!("Blob not found: {}", hash)));
        }

        let data = fs::read(&path).await?;

        tracing::debug!("Read blob: {} ({} bytes)", hash, data.len());

        Ok(data)
    }

    pub async fn exists(&self, hash: &str) -> Result<bool> {
        if !is_valid_hash(hash) {
            return Ok(false);
        }
        Ok(fs::try_exists(self.path_for(hash)?).await?)
    }

    /// Delete a blob; deleting a missing blob is not an error
    pub async fn delete(&self, hash: &str) -> Result<()> {
        let path = self.path_for(hash)?;

        if !fs::try_exists(&path).await? {
            return Ok(());
        }

        fs::remove_file(&path).await?;

        tracing::debug!("Deleted blob: {}", hash);

        Ok(())
    }

    /// Hashes of every stored blob
    pub async fn list_all(&self) -> Result<Vec<String>> {
        let mut hashes = Vec::new();
        self.scan_directory(&self.root, &mut hashes).await?;
        Ok(hashes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, hash: &str) -> Result<PathBuf> {
        if !is_valid_hash(hash) {
            return Err(AppError::BlobStore(format!("Invalid blob hash: {}", hash)));
        }
        Ok(self.root.join(&hash[0..2]).join(&hash[2..4]).join(hash))
    }

    fn scan_directory<'a>(
        &'a self,
        dir: &'a Path,
        hashes: &'a mut Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if !fs::try_exists(dir).await? {
                return Ok(());
            }

            let mut entries = fs::read_dir(dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                let path = entry.path();

                if file_type.is_dir() {
                    self.scan_directory(&path, hashes).await?;
                } else if file_type.is_file() {
                    // Leftover .tmp files and strays are skipped
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        if is_valid_hash(name) {
                            hashes.push(name.to_string());
                        }
                    }
                }
            }

            Ok(())
        })
    }
}
