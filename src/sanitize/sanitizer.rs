// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Whitelist sanitizer for rich-text cell HTML
//!
//! The fragment is walked with a work stack of parent handles, and each
//! parent's child list is rebuilt once per visit. Comments and hard-removed
//! elements are dropped, unknown elements are unwrapped (their children take
//! their place and are filtered in the same pass), and kept elements go
//! through the attribute pass before their own children are visited.
//!
//! After the first pass the output is re-parsed and sanitized again until it
//! stops changing. The tree builder can move content on re-parse (table
//! foster parenting, nested links), and settling makes the result stable.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::policy::{
    default_policy, Policy, EVENT_HANDLER_PREFIX, LINK_TAG, SAFE_REL, STYLE_ATTRIBUTE,
    URL_ATTRIBUTES,
};
use crate::dom::{
    inner_html, Fragment, FragmentParser, Html5everParser, NodeId, NodeType, DEFAULT_CONTEXT,
};
use crate::error::Result;

/// Upper bound on parse/sanitize passes per call
const MAX_PASSES: usize = 4;

lazy_static! {
    static ref DEFAULT_SANITIZER: Sanitizer = Sanitizer::new();
}

/// Sanitize with the default policy
pub fn sanitize(input: &str) -> Result<String> {
    DEFAULT_SANITIZER.sanitize(input)
}

/// What a sanitize call neutralized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    /// Comment nodes removed
    pub comments_removed: usize,
    /// Hard-removed elements (with their subtree)
    pub elements_removed: usize,
    /// Unknown elements replaced by their children
    pub elements_unwrapped: usize,
    /// Attributes removed, including rejected URLs
    pub attributes_removed: usize,
    /// `href`/`src` values rejected by the URL policy
    pub urls_rejected: usize,
    /// Links that had `rel` forced for `target="_blank"`
    pub rel_forced: usize,
    /// Parse/sanitize passes run
    pub passes: usize,
}

impl SanitizeReport {
    /// Total number of neutralized nodes and attributes
    pub fn total(&self) -> usize {
        self.comments_removed
            + self.elements_removed
            + self.elements_unwrapped
            + self.attributes_removed
    }

    /// Nothing was removed or unwrapped
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    fn merge(&mut self, other: &SanitizeReport) {
        self.comments_removed += other.comments_removed;
        self.elements_removed += other.elements_removed;
        self.elements_unwrapped += other.elements_unwrapped;
        self.attributes_removed += other.attributes_removed;
        self.urls_rejected += other.urls_rejected;
        self.rel_forced += other.rel_forced;
        self.passes += other.passes;
    }
}

/// HTML sanitizer
#[derive(Debug, Clone)]
pub struct Sanitizer<P = Html5everParser> {
    policy: Policy,
    parser: P,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer {
    /// Sanitizer with the default policy and the html5ever parser
    pub fn new() -> Self {
        Self::with_policy(default_policy().clone())
    }

    /// Sanitizer with a custom policy
    pub fn with_policy(policy: Policy) -> Self {
        Self::with_parser(policy, Html5everParser::new())
    }
}

impl<P: FragmentParser> Sanitizer<P> {
    /// Sanitizer with a custom policy and parse primitive
    pub fn with_parser(policy: Policy, parser: P) -> Self {
        Self { policy, parser }
    }

    /// Get the policy
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Get the parse primitive
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Sanitize an HTML fragment
    pub fn sanitize(&self, input: &str) -> Result<String> {
        self.sanitize_with_report(input).map(|(html, _)| html)
    }

    /// Sanitize an HTML fragment and report what was neutralized
    ///
    /// Empty input returns immediately without invoking the parser.
    pub fn sanitize_with_report(&self, input: &str) -> Result<(String, SanitizeReport)> {
        if input.is_empty() {
            return Ok((String::new(), SanitizeReport::default()));
        }

        let (mut output, mut report) = self.run_pass(input)?;
        while report.passes < MAX_PASSES && !output.is_empty() {
            let (next, extra) = self.run_pass(&output)?;
            report.merge(&extra);
            if next == output {
                break;
            }
            output = next;
        }

        tracing::debug!(
            input_len = input.len(),
            output_len = output.len(),
            passes = report.passes,
            neutralized = report.total(),
            "sanitized fragment"
        );

        Ok((output, report))
    }

    fn run_pass(&self, input: &str) -> Result<(String, SanitizeReport)> {
        let mut frag = self.parser.parse_fragment(input, DEFAULT_CONTEXT)?;
        let mut report = self.sanitize_fragment(&mut frag);
        report.passes = 1;
        Ok((inner_html(&frag, frag.root()), report))
    }

    /// Sanitize an already parsed fragment in place
    pub fn sanitize_fragment(&self, frag: &mut Fragment) -> SanitizeReport {
        let mut report = SanitizeReport::default();
        let mut stack = vec![frag.root()];

        while let Some(parent) = stack.pop() {
            let kept = self.sanitize_children(frag, parent, &mut report);
            stack.extend(
                kept.into_iter()
                    .rev()
                    .filter(|&id| frag.node_type(id) == NodeType::Element),
            );
        }

        report
    }

    /// Rebuild the child list of `parent` in a single pass
    ///
    /// Children of unwrapped elements are spliced into the pending list and
    /// filtered in the same pass. Returns the children that stay.
    fn sanitize_children(
        &self,
        frag: &mut Fragment,
        parent: NodeId,
        report: &mut SanitizeReport,
    ) -> Vec<NodeId> {
        let mut pending = frag.take_children(parent);
        pending.reverse();
        let mut kept = Vec::with_capacity(pending.len());

        while let Some(node) = pending.pop() {
            match frag.node_type(node) {
                NodeType::Comment => {
                    report.comments_removed += 1;
                    tracing::trace!("removed comment");
                }
                NodeType::Element => {
                    let tag = frag.local_name(node).unwrap_or_default().to_ascii_lowercase();

                    if self.policy.is_removed(&tag) {
                        report.elements_removed += 1;
                        tracing::trace!(tag = %tag, "removed element");
                        continue;
                    }

                    if !self.policy.is_tag_allowed(&tag) {
                        let moved = frag.take_children(node);
                        pending.extend(moved.into_iter().rev());
                        report.elements_unwrapped += 1;
                        tracing::trace!(tag = %tag, "unwrapped element");
                        continue;
                    }

                    self.sanitize_attributes(frag, node, &tag, report);
                    kept.push(node);
                }
                NodeType::Text | NodeType::Root => kept.push(node),
            }
        }

        frag.replace_children(parent, kept.clone());
        kept
    }

    fn sanitize_attributes(
        &self,
        frag: &mut Fragment,
        element: NodeId,
        tag: &str,
        report: &mut SanitizeReport,
    ) {
        let attributes = frag.attributes(element);
        let mut kept = Vec::with_capacity(attributes.len());

        for attr in attributes {
            let name = attr.name.to_ascii_lowercase();

            let reason = if name.starts_with(EVENT_HANDLER_PREFIX) {
                Some("event handler")
            } else if name == STYLE_ATTRIBUTE {
                Some("style")
            } else if !self.policy.is_attribute_allowed(tag, &name) {
                Some("not allowed")
            } else if URL_ATTRIBUTES.contains(&name.as_str())
                && !self.policy.urls.is_safe_url(&attr.value)
            {
                report.urls_rejected += 1;
                Some("unsafe url")
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    report.attributes_removed += 1;
                    tracing::trace!(tag = %tag, attribute = %name, reason, "removed attribute");
                }
                None => kept.push(attr.clone()),
            }
        }

        let guard_link = tag == LINK_TAG
            && kept.iter().any(|a| a.name == "href")
            && kept.iter().any(|a| a.name == "target" && a.value == "_blank");

        frag.set_attributes(element, kept);
        if guard_link {
            frag.set_attribute(element, "rel", SAFE_REL);
            report.rel_forced += 1;
        }
    }
}
