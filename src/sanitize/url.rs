// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL scheme policy for `href` and `src` values

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

lazy_static! {
    /// `letter (letter | digit | + | - | .)* :` at the start of a lowercased value
    static ref SCHEME_PREFIX: Regex = Regex::new(r"^[a-z][a-z0-9+.\-]*:").unwrap();

    static ref SCHEME_NAME: Regex = Regex::new(r"^[a-z][a-z0-9+.\-]*$").unwrap();

    /// Base64 image data URI; the subtype is checked against the policy
    static ref DATA_IMAGE: Regex =
        Regex::new(r"^data:image/([a-z0-9.+\-]+);base64,[a-z0-9+/=]+$").unwrap();
}

/// Decides whether a URL attribute value may stay on an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlPolicy {
    /// Schemes accepted for absolute URLs, without the trailing colon
    pub allowed_schemes: Vec<String>,
    /// Image subtypes accepted in `data:image/<subtype>;base64,` URIs
    pub data_image_types: Vec<String>,
}

impl Default for UrlPolicy {
    fn default() -> Self {
        Self {
            allowed_schemes: ["http", "https", "mailto", "tel"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            data_image_types: ["png", "jpeg", "jpg", "gif", "webp", "avif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UrlPolicy {
    /// Create the default URL policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow another scheme
    pub fn allow_scheme(mut self, scheme: impl Into<String>) -> Self {
        let scheme = scheme.into().trim_end_matches(':').to_ascii_lowercase();
        if !self.allowed_schemes.contains(&scheme) {
            self.allowed_schemes.push(scheme);
        }
        self
    }

    /// Allow another data-URI image subtype
    pub fn allow_data_image_type(mut self, subtype: impl Into<String>) -> Self {
        let subtype = subtype.into().to_ascii_lowercase();
        if !self.data_image_types.contains(&subtype) {
            self.data_image_types.push(subtype);
        }
        self
    }

    /// Check a raw attribute value
    ///
    /// Relative references (no scheme prefix) are accepted, including
    /// protocol-relative `//host/path`.
    pub fn is_safe_url(&self, value: &str) -> bool {
        let url = normalize(value);
        if url.is_empty() {
            return false;
        }

        if url.starts_with("data:") {
            return DATA_IMAGE
                .captures(&url)
                .map_or(false, |cap| self.data_image_types.iter().any(|t| t == &cap[1]));
        }

        match SCHEME_PREFIX.find(&url) {
            None => true,
            Some(m) => {
                let scheme = &m.as_str()[..m.end() - 1];
                self.allowed_schemes.iter().any(|s| s == scheme)
            }
        }
    }

    /// Check that every configured scheme and subtype is well formed
    pub fn validate(&self) -> Result<()> {
        for scheme in &self.allowed_schemes {
            if !SCHEME_NAME.is_match(scheme) {
                return Err(Error::config(format!("invalid URL scheme '{}'", scheme)));
            }
        }
        for subtype in &self.data_image_types {
            if subtype.is_empty()
                || !subtype
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+.-".contains(c))
            {
                return Err(Error::config(format!("invalid data image type '{}'", subtype)));
            }
        }
        Ok(())
    }
}

/// Trim, drop embedded tab/newline characters and lowercase
///
/// Browsers strip ASCII tab and newline anywhere in a URL before parsing it,
/// so `java\tscript:` must be inspected as `javascript:`.
fn normalize(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_rejected() {
        let policy = UrlPolicy::default();
        assert!(!policy.is_safe_url(""));
        assert!(!policy.is_safe_url("   \n"));
    }

    #[test]
    fn test_allowed_schemes() {
        let policy = UrlPolicy::default();
        assert!(policy.is_safe_url("https://example.com/a?b=c"));
        assert!(policy.is_safe_url("HTTP://EXAMPLE.COM"));
        assert!(policy.is_safe_url("mailto:billing@example.com"));
        assert!(policy.is_safe_url("tel:+358401234567"));
    }

    #[test]
    fn test_dangerous_schemes() {
        let policy = UrlPolicy::default();
        assert!(!policy.is_safe_url("javascript:alert(1)"));
        assert!(!policy.is_safe_url("  JavaScript:alert(1)"));
        assert!(!policy.is_safe_url("vbscript:msgbox"));
        assert!(!policy.is_safe_url("file:///etc/passwd"));
        assert!(!policy.is_safe_url("java\tscript:alert(1)"));
        assert!(!policy.is_safe_url("\u{1}javascript:alert(1)"));
    }

    #[test]
    fn test_relative_references() {
        let policy = UrlPolicy::default();
        assert!(policy.is_safe_url("/invoices/12"));
        assert!(policy.is_safe_url("#row-4"));
        assert!(policy.is_safe_url("?page=2"));
        assert!(policy.is_safe_url("//cdn.example.com/x.png"));
        // A digit cannot start a scheme
        assert!(policy.is_safe_url("10:30"));
    }

    #[test]
    fn test_data_uris() {
        let policy = UrlPolicy::default();
        assert!(policy.is_safe_url("data:image/png;base64,AAAA"));
        assert!(policy.is_safe_url("DATA:IMAGE/JPEG;BASE64,/9j/4AAQ=="));
        assert!(!policy.is_safe_url("data:image/svg+xml;base64,PHN2Zz4="));
        assert!(!policy.is_safe_url("data:text/html;base64,AAAA"));
        assert!(!policy.is_safe_url("data:image/png,AAAA"));
        assert!(!policy.is_safe_url("data:image/png;base64,AA AA"));
        assert!(!policy.is_safe_url("data:"));
    }

    #[test]
    fn test_custom_schemes() {
        let policy = UrlPolicy::new().allow_scheme("ftp:").allow_data_image_type("SVG+XML");
        assert!(policy.is_safe_url("ftp://files.example.com"));
        assert!(policy.is_safe_url("data:image/svg+xml;base64,PHN2Zz4="));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_scheme() {
        let policy = UrlPolicy {
            allowed_schemes: vec!["1http".to_string()],
            ..Default::default()
        };
        assert!(policy.validate().unwrap_err().is_config());
    }
}
