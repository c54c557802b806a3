// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Whitelist HTML sanitization
//!
//! - Tag and attribute policy (serde-loadable)
//! - URL scheme policy for `href`/`src`
//! - Tree-walking sanitizer with a neutralization report

mod policy;
mod sanitizer;
mod url;

pub use policy::{
    default_policy, Policy, EVENT_HANDLER_PREFIX, LINK_TAG, SAFE_REL, STYLE_ATTRIBUTE,
    URL_ATTRIBUTES,
};
pub use sanitizer::{sanitize, SanitizeReport, Sanitizer};
pub use url::UrlPolicy;

/// Check a URL against the default URL policy
pub fn is_safe_url(value: &str) -> bool {
    default_policy().urls.is_safe_url(value)
}
