// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # cellsan - Rich-text cell sanitizer
//!
//! Whitelist HTML sanitizer for user-authored spreadsheet cell content.
//! Pasted markup is parsed with html5ever, walked and rewritten into a safe
//! subset, then serialized back for re-rendering and export.
//!
//! ## Features
//!
//! - Tag whitelist: unknown tags are unwrapped, active content is removed
//! - Attribute whitelist: global and per-tag tables, no event handlers or styles
//! - URL policy: http/https/mailto/tel, relative references, base64 images
//! - Tabnabbing guard: `rel="noopener noreferrer"` on `target="_blank"` links
//! - JSON-loadable policies and a neutralization report
//! - Line extraction and grid shaping for CSV export
//!
//! ## Example
//!
//! ```rust
//! use cellsan::sanitize;
//!
//! let html = sanitize(r#"<p onclick="x()">Total<script>steal()</script></p>"#).unwrap();
//! assert_eq!(html, "<p>Total</p>");
//! ```

pub mod dom;
pub mod error;
pub mod extract;
pub mod sanitize;

// Re-exports for convenience

// DOM
pub use dom::{Fragment, FragmentParser, Html5everParser, NodeId, NodeKind, NodeType};

// Errors
pub use error::{Error, ErrorContext, Result};

// Extraction
pub use extract::{extract_lines, extract_sanitized_lines, normalize_rows};

// Sanitizer
pub use sanitize::{default_policy, is_safe_url, sanitize, Policy, SanitizeReport, Sanitizer};
pub use sanitize::UrlPolicy;

/// cellsan version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
