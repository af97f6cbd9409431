// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media uploads.
//!
//! Uploaded files are checked against per-kind size and type limits, placed
//! at `<document>/<kind>/<uuid>.<ext>`, and handed to a [`MediaStore`] that
//! returns a retrievable URL.

use crate::error::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores uploaded bytes and returns the URL they can be fetched from.
pub trait MediaStore {
    fn upload(&mut self, bytes: &[u8], path: &str) -> Result<String, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Largest accepted upload in bytes.
    pub fn max_size(&self) -> u64 {
        match self {
            MediaKind::Image => 5 * 1024 * 1024,
            MediaKind::Video => 100 * 1024 * 1024,
            MediaKind::Audio => 20 * 1024 * 1024,
        }
    }

    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["image/jpeg", "image/png", "image/gif", "image/webp"],
            MediaKind::Video => &["video/mp4", "video/webm"],
            MediaKind::Audio => &["audio/mpeg", "audio/wav", "audio/ogg"],
        }
    }

    /// File extensions offered in file pickers.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            MediaKind::Image => &["jpg", "jpeg", "png", "gif", "webp"],
            MediaKind::Video => &["mp4", "webm"],
            MediaKind::Audio => &["mp3", "wav", "ogg"],
        }
    }
}

/// Guess a MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        _ => return None,
    };
    Some(mime)
}

/// Check an upload against the limits for `kind`.
pub fn validate_upload(
    kind: MediaKind,
    file_name: &str,
    size: u64,
    mime: &str,
) -> Result<(), StoreError> {
    if size > kind.max_size() {
        return Err(StoreError::InvalidMedia(format!(
            "{file_name} is {size} bytes, the limit for {} is {} bytes",
            kind.as_str(),
            kind.max_size()
        )));
    }
    if !kind.allowed_types().contains(&mime) {
        return Err(StoreError::InvalidMedia(format!(
            "type {mime} is not allowed for {}",
            kind.as_str()
        )));
    }
    Ok(())
}

/// Storage path for a new upload: `<document>/<kind>/<uuid>.<ext>`.
pub fn upload_path(document_id: &str, kind: MediaKind, file_name: &str) -> String {
    let id = uuid::Uuid::new_v4();
    match Path::new(file_name).extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{document_id}/{}/{id}.{ext}", kind.as_str()),
        None => format!("{document_id}/{}/{id}", kind.as_str()),
    }
}

/// Validate a local file and upload it. Returns the stored URL.
pub fn upload_file(
    store: &mut dyn MediaStore,
    document_id: &str,
    kind: MediaKind,
    file: &Path,
) -> Result<String, StoreError> {
    let file_name = file
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let mime = mime_for_path(file).ok_or_else(|| {
        StoreError::InvalidMedia(format!("unrecognized file type: {file_name}"))
    })?;
    let size = fs::metadata(file)?.len();
    validate_upload(kind, &file_name, size, mime)?;

    let bytes = fs::read(file)?;
    let url = store.upload(&bytes, &upload_path(document_id, kind, &file_name))?;
    log::info!("Uploaded {} ({} bytes) to {}", file_name, size, url);
    Ok(url)
}

/// Media store writing into a local directory.
#[derive(Debug, Clone)]
pub struct DirMediaStore {
    root: PathBuf,
}

impl DirMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a URL returned by [`MediaStore::upload`] back to a local path.
    pub fn local_path(url: &str) -> Option<PathBuf> {
        url.strip_prefix("file://").map(PathBuf::from)
    }
}

impl MediaStore for DirMediaStore {
    fn upload(&mut self, bytes: &[u8], path: &str) -> Result<String, StoreError> {
        if path.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(StoreError::InvalidMedia(format!("invalid media path: {path}")));
        }
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, bytes)?;
        Ok(format!("file://{}", target.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limits() {
        assert!(validate_upload(MediaKind::Image, "a.png", 5 * 1024 * 1024, "image/png").is_ok());
        assert!(matches!(
            validate_upload(MediaKind::Image, "a.png", 5 * 1024 * 1024 + 1, "image/png"),
            Err(StoreError::InvalidMedia(_))
        ));
        assert!(validate_upload(MediaKind::Video, "v.mp4", 90 * 1024 * 1024, "video/mp4").is_ok());
    }

    #[test]
    fn test_type_limits() {
        assert!(validate_upload(MediaKind::Video, "v.mov", 10, "video/quicktime").is_err());
        assert!(validate_upload(MediaKind::Audio, "s.png", 10, "image/png").is_err());
        assert!(validate_upload(MediaKind::Audio, "s.ogg", 10, "audio/ogg").is_ok());
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(mime_for_path(Path::new("clip.MP4")), Some("video/mp4"));
        assert_eq!(mime_for_path(Path::new("photo.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("noext")), None);
    }

    #[test]
    fn test_upload_path_layout() {
        let path = upload_path("doc42", MediaKind::Video, "signe.webm");
        let parts: Vec<&str> = path.split('/').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "doc42");
        assert_eq!(parts[1], "video");
        assert!(parts[2].ends_with(".webm"));
        assert_ne!(path, upload_path("doc42", MediaKind::Video, "signe.webm"));
    }

    #[test]
    fn test_upload_file_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("page.png");
        fs::write(&source, b"not really a png").unwrap();
        let mut store = DirMediaStore::new(dir.path().join("media"));

        let url = upload_file(&mut store, "doc1", MediaKind::Image, &source).unwrap();

        let local = DirMediaStore::local_path(&url).unwrap();
        assert!(local.starts_with(dir.path().join("media").join("doc1").join("image")));
        assert_eq!(fs::read(local).unwrap(), b"not really a png");
    }

    #[test]
    fn test_upload_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        fs::write(&source, b"hello").unwrap();
        let mut store = DirMediaStore::new(dir.path());

        assert!(matches!(
            upload_file(&mut store, "doc1", MediaKind::Image, &source),
            Err(StoreError::InvalidMedia(_))
        ));
    }

    #[test]
    fn test_dir_store_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirMediaStore::new(dir.path());
        assert!(store.upload(b"x", "../outside.png").is_err());
    }
}
