// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fragment serialization following the HTML fragment serialization rules

use super::node::{Fragment, NodeId, NodeKind};

/// Elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted without escaping
pub const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// Elements where the parser drops one leading newline
const NEWLINE_ELIDING_ELEMENTS: &[&str] = &["pre", "textarea", "listing"];

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serialize the children of `id` (the node's own tag is not included)
pub fn inner_html(frag: &Fragment, id: NodeId) -> String {
    let mut out = String::new();
    let stack = frag.children(id).iter().rev().map(|&c| Step::Open(c)).collect();
    write_steps(frag, stack, &mut out);
    out
}

/// Serialize a node including its own tag
pub fn outer_html(frag: &Fragment, id: NodeId) -> String {
    let mut out = String::new();
    write_steps(frag, vec![Step::Open(id)], &mut out);
    out
}

fn write_steps(frag: &Fragment, mut stack: Vec<Step>, out: &mut String) {
    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Close(node) => {
                if let Some(name) = frag.local_name(node) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
                continue;
            }
            Step::Open(node) => node,
        };

        match frag.kind(node) {
            NodeKind::Text(text) => {
                let raw = frag
                    .parent(node)
                    .and_then(|p| frag.local_name(p))
                    .map_or(false, |name| RAW_TEXT_ELEMENTS.contains(&name));
                if raw {
                    out.push_str(text);
                } else {
                    escape_text(text, out);
                }
            }
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Root => {
                stack.extend(frag.children(node).iter().rev().map(|&c| Step::Open(c)));
            }
            NodeKind::Element { name, attributes } => {
                out.push('<');
                out.push_str(name);
                for attr in attributes {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    escape_attribute(&attr.value, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    continue;
                }

                if NEWLINE_ELIDING_ELEMENTS.contains(&name.as_str()) {
                    let leading_newline = frag.children(node).first().map_or(false, |&first| {
                        matches!(frag.kind(first), NodeKind::Text(t) if t.starts_with('\n'))
                    });
                    if leading_newline {
                        out.push('\n');
                    }
                }

                stack.push(Step::Close(node));
                stack.extend(frag.children(node).iter().rev().map(|&c| Step::Open(c)));
            }
        }
    }
}

/// Escape character data
fn escape_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

/// Escape a double-quoted attribute value
fn escape_attribute(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}
