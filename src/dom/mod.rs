// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! DOM primitives for fragment sanitization
//!
//! html5ever builds the tree, which is copied into an owned arena
//! (`Fragment`) that supports detaching, unwrapping and attribute edits.

mod node;
mod parser;
pub mod serialize;

pub use node::{Attribute, Fragment, NodeId, NodeKind, NodeType};
pub use parser::{parse_fragment, FragmentParser, Html5everParser, DEFAULT_CONTEXT};
pub use serialize::{inner_html, outer_html};
