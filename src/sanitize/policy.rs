// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Tag and attribute whitelist configuration

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::url::UrlPolicy;
use crate::dom::serialize::RAW_TEXT_ELEMENTS;
use crate::error::{Error, ErrorContext, Result};

/// Attribute names starting with this prefix are event handlers
pub const EVENT_HANDLER_PREFIX: &str = "on";

/// Attributes carrying URLs checked against the `UrlPolicy`
pub const URL_ATTRIBUTES: &[&str] = &["href", "src"];

/// Attribute that is removed whatever the policy says
pub const STYLE_ATTRIBUTE: &str = "style";

/// Hyperlink tag that gets the tabnabbing guard
pub const LINK_TAG: &str = "a";

/// `rel` value forced on `target="_blank"` links
pub const SAFE_REL: &str = "noopener noreferrer";

const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "i", "u", "strong", "em", "small", "sub", "sup", "p", "br", "div", "span", "ul",
    "ol", "li", "blockquote", "code", "pre", "img", "h1", "h2", "h3", "h4", "h5", "h6", "table",
    "thead", "tbody", "tr", "th", "td",
];

const REMOVED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "link", "meta", "base", "form", "input",
    "textarea", "button", "select",
];

const GLOBAL_ATTRIBUTES: &[&str] = &["class", "id", "title", "aria-label", "role"];

const LINK_ATTRIBUTES: &[&str] = &["href", "title", "target", "rel"];

const IMAGE_ATTRIBUTES: &[&str] = &["src", "alt", "title", "width", "height"];

lazy_static! {
    static ref DEFAULT_POLICY: Policy = Policy::default();
}

/// Shared default policy, built once
pub fn default_policy() -> &'static Policy {
    &DEFAULT_POLICY
}

fn set_of(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Sanitization policy
///
/// Everything not listed is either unwrapped (unknown tags) or removed
/// (attributes, hard-removed tags). A policy loaded from JSON may omit any
/// field; omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Tags kept in the output
    pub allowed_tags: BTreeSet<String>,
    /// Tags dropped together with their whole subtree
    pub removed_tags: BTreeSet<String>,
    /// Attributes allowed on every kept tag
    pub global_attributes: BTreeSet<String>,
    /// Extra attributes allowed per tag
    pub tag_attributes: BTreeMap<String, BTreeSet<String>>,
    /// Policy for `href` and `src` values
    pub urls: UrlPolicy,
}

impl Default for Policy {
    fn default() -> Self {
        let mut tag_attributes = BTreeMap::new();
        tag_attributes.insert("a".to_string(), set_of(LINK_ATTRIBUTES));
        tag_attributes.insert("img".to_string(), set_of(IMAGE_ATTRIBUTES));

        Self {
            allowed_tags: set_of(ALLOWED_TAGS),
            removed_tags: set_of(REMOVED_TAGS),
            global_attributes: set_of(GLOBAL_ATTRIBUTES),
            tag_attributes,
            urls: UrlPolicy::default(),
        }
    }
}

impl Policy {
    /// Create the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a policy from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Policy = serde_json::from_str(json)?;
        let policy = policy.normalized();
        policy.validate()?;
        Ok(policy)
    }

    /// Load and validate a policy from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).context(&path.display().to_string())?;
        Self::from_json(&json).context(&path.display().to_string())
    }

    /// Pretty JSON representation
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Keep a tag
    pub fn allow_tag(mut self, tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        self.removed_tags.remove(&tag);
        self.allowed_tags.insert(tag);
        self
    }

    /// Drop a tag with its subtree
    pub fn remove_tag(mut self, tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        self.allowed_tags.remove(&tag);
        self.tag_attributes.remove(&tag);
        self.removed_tags.insert(tag);
        self
    }

    /// Allow an attribute on one tag
    pub fn allow_attribute(mut self, tag: &str, name: &str) -> Self {
        self.tag_attributes
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .insert(name.to_ascii_lowercase());
        self
    }

    /// Allow an attribute on every kept tag
    pub fn allow_global_attribute(mut self, name: &str) -> Self {
        self.global_attributes.insert(name.to_ascii_lowercase());
        self
    }

    /// Replace the URL policy
    pub fn url_policy(mut self, urls: UrlPolicy) -> Self {
        self.urls = urls;
        self
    }

    /// Check if a tag is kept
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Check if a tag is dropped with its subtree
    pub fn is_removed(&self, tag: &str) -> bool {
        self.removed_tags.contains(tag)
    }

    /// Check the global and per-tag attribute tables
    pub fn is_attribute_allowed(&self, tag: &str, name: &str) -> bool {
        self.global_attributes.contains(name)
            || self
                .tag_attributes
                .get(tag)
                .map_or(false, |names| names.contains(name))
    }

    /// Check the policy for contradictions
    ///
    /// Raw-text elements cannot be kept: their text is serialized unescaped
    /// and would turn back into markup when re-parsed.
    pub fn validate(&self) -> Result<()> {
        if let Some(tag) = self.allowed_tags.intersection(&self.removed_tags).next() {
            return Err(Error::config(format!(
                "tag '{}' is both allowed and removed",
                tag
            )));
        }
        if let Some(tag) = self
            .allowed_tags
            .iter()
            .find(|tag| RAW_TEXT_ELEMENTS.contains(&tag.as_str()))
        {
            return Err(Error::config(format!(
                "raw-text tag '{}' cannot be allowed",
                tag
            )));
        }
        if let Some(tag) = self
            .tag_attributes
            .keys()
            .find(|tag| !self.allowed_tags.contains(*tag))
        {
            return Err(Error::config(format!(
                "attributes configured for tag '{}' which is not allowed",
                tag
            )));
        }
        self.urls.validate()
    }

    /// Lowercase every tag and attribute name
    fn normalized(self) -> Self {
        let lower = |set: BTreeSet<String>| -> BTreeSet<String> {
            set.into_iter().map(|s| s.to_ascii_lowercase()).collect()
        };

        let mut tag_attributes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (tag, names) in self.tag_attributes {
            tag_attributes
                .entry(tag.to_ascii_lowercase())
                .or_default()
                .extend(lower(names));
        }

        let mut urls = self.urls;
        urls.allowed_schemes = urls
            .allowed_schemes
            .into_iter()
            .map(|s| s.trim_end_matches(':').to_ascii_lowercase())
            .collect();
        urls.data_image_types = urls
            .data_image_types
            .into_iter()
            .map(|s| s.to_ascii_lowercase())
            .collect();

        Self {
            allowed_tags: lower(self.allowed_tags),
            removed_tags: lower(self.removed_tags),
            global_attributes: lower(self.global_attributes),
            tag_attributes,
            urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_tables() {
        let policy = default_policy();
        assert_eq!(policy.allowed_tags.len(), 32);
        assert!(policy.is_tag_allowed("h6"));
        assert!(!policy.is_tag_allowed("section"));
        assert!(policy.is_removed("script"));
        assert!(!policy.is_removed("span"));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_attribute_tables() {
        let policy = Policy::default();
        assert!(policy.is_attribute_allowed("td", "class"));
        assert!(policy.is_attribute_allowed("a", "href"));
        assert!(policy.is_attribute_allowed("img", "width"));
        assert!(!policy.is_attribute_allowed("td", "href"));
        assert!(!policy.is_attribute_allowed("a", "src"));
        assert!(!policy.is_attribute_allowed("img", "target"));
    }

    #[test]
    fn test_builder() {
        let policy = Policy::new()
            .allow_tag("HR")
            .allow_attribute("td", "colspan")
            .allow_global_attribute("lang")
            .remove_tag("img");

        assert!(policy.is_tag_allowed("hr"));
        assert!(policy.is_attribute_allowed("td", "colspan"));
        assert!(policy.is_attribute_allowed("p", "lang"));
        assert!(policy.is_removed("img"));
        assert!(!policy.tag_attributes.contains_key("img"));
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let policy = Policy::from_json(r#"{"global_attributes": ["Class", "lang"]}"#).unwrap();
        assert!(policy.is_attribute_allowed("p", "lang"));
        assert!(policy.is_attribute_allowed("p", "class"));
        assert!(!policy.is_attribute_allowed("p", "id"));
        assert_eq!(policy.allowed_tags, Policy::default().allowed_tags);
        assert_eq!(policy.urls, UrlPolicy::default());
    }

    #[test]
    fn test_json_round_trip() {
        let policy = Policy::new().allow_tag("hr");
        let json = policy.to_json_pretty().unwrap();
        assert_eq!(Policy::from_json(&json).unwrap(), policy);
    }

    #[test]
    fn test_validate_rejects_contradictions() {
        let err = Policy::from_json(r#"{"removed_tags": ["script", "b"]}"#).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("'b'"));

        let err = Policy::from_json(r#"{"tag_attributes": {"video": ["src"]}}"#).unwrap_err();
        assert!(err.to_string().contains("video"));

        let err = Policy::from_json(r#"{"urls": {"allowed_schemes": ["java script"]}}"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_validate_rejects_raw_text_tags() {
        for tag in ["noscript", "xmp", "noembed", "plaintext"] {
            let err = Policy::new().allow_tag(tag).validate().unwrap_err();
            assert!(err.is_config());
            assert!(err.to_string().contains(tag));
        }

        let json = r#"{"allowed_tags": ["p", "style"], "removed_tags": ["script"]}"#;
        assert!(Policy::from_json(json).unwrap_err().is_config());
    }

    #[test]
    fn test_malformed_json() {
        let err = Policy::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"allowed_tags": ["p", "br"], "tag_attributes": {{}}}}"#).unwrap();

        let policy = Policy::from_file(file.path()).unwrap();
        assert_eq!(policy.allowed_tags.len(), 2);
        assert!(!policy.is_tag_allowed("a"));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Policy::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }
}
