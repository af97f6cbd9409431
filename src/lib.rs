// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! signbook - bilingual book authoring
//!
//! Documents pair written text with sign-language video, page by page.
//! This crate holds the document model and its editing operations, the
//! synchronizer that maps video playback to time-coded annotations, the
//! document and media store contracts, and the editing session that ties
//! them together with undo and autosave.

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod search;
pub mod session;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{EditError, SessionError, StoreError};
