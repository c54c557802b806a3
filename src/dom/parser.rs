// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML fragment parser using html5ever

use html5ever::tendril::TendrilSink;
use html5ever::{namespace_url, ns, LocalName, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use super::node::{Attribute, Fragment, NodeId};
use crate::error::{Error, Result};

/// Context element used when the caller does not name one
pub const DEFAULT_CONTEXT: &str = "div";

/// Parse primitive: turns fragment markup into a `Fragment`
///
/// Implementations must recover from malformed markup the way an HTML5 tree
/// builder does and only fail when no tree can be produced at all.
pub trait FragmentParser {
    /// Parse `html` as the contents of a `context` element
    fn parse_fragment(&self, html: &str, context: &str) -> Result<Fragment>;
}

/// html5ever-backed parser
#[derive(Debug, Clone, Copy)]
pub struct Html5everParser {
    /// Parse `<noscript>` contents as raw text, like a browser with scripting on
    pub scripting_enabled: bool,
}

impl Html5everParser {
    /// Parser with scripting disabled, so `<noscript>` contents are markup
    pub fn new() -> Self {
        Self {
            scripting_enabled: false,
        }
    }

    /// Parser that treats `<noscript>` contents as raw text
    pub fn with_scripting() -> Self {
        Self {
            scripting_enabled: true,
        }
    }
}

impl Default for Html5everParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentParser for Html5everParser {
    fn parse_fragment(&self, html: &str, context: &str) -> Result<Fragment> {
        let mut opts = ParseOpts::default();
        opts.tree_builder.scripting_enabled = self.scripting_enabled;

        let context = QualName::new(None, ns!(html), LocalName::from(context));
        let dom = html5ever::parse_fragment(RcDom::default(), opts, context, Vec::new())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| Error::parse(e.to_string()))?;

        for err in dom.errors.iter() {
            tracing::trace!(error = %err, "recovered HTML parse error");
        }

        // html5ever places the parsed nodes under a synthetic <html> element
        let container = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|child| matches!(child.data, RcNodeData::Element { .. }))
            .cloned()
            .ok_or_else(|| Error::parse("fragment parser produced no container element"))?;

        let mut frag = Fragment::new();
        DomConverter::new(&mut frag).convert(&container);
        Ok(frag)
    }
}

/// Parse a fragment with the default parser and a `div` context
pub fn parse_fragment(html: &str) -> Result<Fragment> {
    Html5everParser::new().parse_fragment(html, DEFAULT_CONTEXT)
}

/// Converts an html5ever DOM subtree into our fragment
struct DomConverter<'a> {
    frag: &'a mut Fragment,
}

impl<'a> DomConverter<'a> {
    fn new(frag: &'a mut Fragment) -> Self {
        Self { frag }
    }

    /// Copy the children of `container` under the fragment root
    fn convert(mut self, container: &Handle) {
        let root = self.frag.root();
        let mut stack: Vec<(Handle, NodeId)> = container
            .children
            .borrow()
            .iter()
            .rev()
            .map(|child| (child.clone(), root))
            .collect();

        while let Some((handle, parent)) = stack.pop() {
            let Some(id) = self.convert_node(&handle) else {
                continue;
            };
            self.frag.append_child(parent, id);
            stack.extend(
                handle
                    .children
                    .borrow()
                    .iter()
                    .rev()
                    .map(|child| (child.clone(), id)),
            );
        }
    }

    fn convert_node(&mut self, handle: &Handle) -> Option<NodeId> {
        match handle.data {
            RcNodeData::Text { ref contents } => {
                Some(self.frag.create_text(contents.borrow().to_string()))
            }
            RcNodeData::Comment { ref contents } => {
                Some(self.frag.create_comment(contents.to_string()))
            }
            RcNodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let attributes = attrs
                    .borrow()
                    .iter()
                    .map(|attr| {
                        let name = match attr.name.prefix {
                            Some(ref prefix) => format!("{}:{}", prefix, attr.name.local),
                            None => attr.name.local.to_string(),
                        };
                        Attribute::new(name, attr.value.to_string())
                    })
                    .collect();
                Some(self.frag.create_element(&name.local, attributes))
            }
            // Doctypes and processing instructions carry nothing renderable
            RcNodeData::Document
            | RcNodeData::Doctype { .. }
            | RcNodeData::ProcessingInstruction { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeKind, NodeType};

    #[test]
    fn test_parse_simple_fragment() {
        let frag = parse_fragment("<p>Hello</p>").unwrap();
        let root = frag.root();
        assert_eq!(frag.children(root).len(), 1);

        let p = frag.children(root)[0];
        assert_eq!(frag.local_name(p), Some("p"));
        assert_eq!(frag.text_content(p), "Hello");
    }

    #[test]
    fn test_parse_with_attributes() {
        let frag = parse_fragment(r#"<DIV ID="test" Class="foo bar">content</DIV>"#).unwrap();
        let div = frag.children(frag.root())[0];
        assert_eq!(frag.local_name(div), Some("div"));
        assert_eq!(frag.get_attribute(div, "id"), Some("test"));
        assert_eq!(frag.get_attribute(div, "class"), Some("foo bar"));
    }

    #[test]
    fn test_bare_text_and_comments() {
        let frag = parse_fragment("left<!-- note -->right").unwrap();
        let kinds: Vec<_> = frag
            .children(frag.root())
            .iter()
            .map(|&id| frag.node_type(id))
            .collect();
        assert_eq!(kinds, vec![NodeType::Text, NodeType::Comment, NodeType::Text]);
    }

    #[test]
    fn test_entities_are_decoded() {
        let frag = parse_fragment(r#"<a href="&#106;avascript:x">&lt;b&gt;</a>"#).unwrap();
        let a = frag.children(frag.root())[0];
        assert_eq!(frag.get_attribute(a, "href"), Some("javascript:x"));
        assert_eq!(frag.text_content(a), "<b>");
    }

    #[test]
    fn test_unclosed_div_cannot_escape_container() {
        let frag = parse_fragment("</div><b>x</b>").unwrap();
        let root = frag.root();
        let b = frag.children(root)[0];
        assert_eq!(frag.local_name(b), Some("b"));
    }

    #[test]
    fn test_malformed_markup_recovers() {
        let frag = parse_fragment("<b><i>x</b>y</i><p>z").unwrap();
        assert_eq!(frag.text_content(frag.root()), "xyz");
    }

    #[test]
    fn test_noscript_is_markup_by_default() {
        let frag = parse_fragment("<noscript><b>x</b></noscript>").unwrap();
        let noscript = frag.children(frag.root())[0];
        let inner = frag.children(noscript)[0];
        assert_eq!(frag.local_name(inner), Some("b"));
        assert_eq!(frag.text_content(inner), "x");
    }

    #[test]
    fn test_noscript_is_raw_text_with_scripting() {
        let frag = Html5everParser::with_scripting()
            .parse_fragment("<noscript><b>x</b></noscript>", DEFAULT_CONTEXT)
            .unwrap();
        let noscript = frag.children(frag.root())[0];
        let inner = frag.children(noscript)[0];
        assert_eq!(frag.kind(inner), &NodeKind::Text("<b>x</b>".to_string()));
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let html = "<span>".repeat(5_000);
        let frag = parse_fragment(&html).unwrap();
        assert_eq!(frag.descendants(frag.root()).len(), 5_000);
    }
}
