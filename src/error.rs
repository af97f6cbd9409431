// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the document model, the stores and the editing session.

use thiserror::Error;

/// A rejected editing operation. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("index {index} is out of range for {len} pages")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("precondition failed: {0}")]
    Precondition(String),
}

/// Failure reported by a document or media store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("document {id} is corrupt: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: EditError,
    },

    #[error("invalid media: {0}")]
    InvalidMedia(String),
}

/// Error surfaced by [`crate::session::EditingSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
