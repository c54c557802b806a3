// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Line extraction and grid shaping for export
//!
//! Cells hold sanitized rich text where `<br>` separates lines. Export
//! splits cells into lines and pads rows into a rectangular grid.

use lazy_static::lazy_static;
use regex::Regex;

use crate::dom::FragmentParser;
use crate::error::Result;
use crate::sanitize::Sanitizer;

lazy_static! {
    static ref BR_TAG: Regex = Regex::new(r"(?i)<br\s*/?>").unwrap();
}

/// Split cell markup on `<br>` tags into trimmed, non-empty lines
pub fn extract_lines(cell_html: &str) -> Vec<String> {
    BR_TAG
        .split(cell_html)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Sanitize raw cell markup, then split it into lines
pub fn extract_sanitized_lines<P: FragmentParser>(
    sanitizer: &Sanitizer<P>,
    raw: &str,
) -> Result<Vec<String>> {
    let clean = sanitizer.sanitize(raw)?;
    Ok(extract_lines(&clean))
}

/// Shape scraped rows into a rectangular grid
///
/// Trailing blank cells are trimmed from every row, trailing empty rows are
/// dropped and the remaining rows are padded with `""` to the widest row.
pub fn normalize_rows(rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|mut row| {
            while row.last().map_or(false, |cell| cell.trim().is_empty()) {
                row.pop();
            }
            row
        })
        .collect();

    while rows.last().map_or(false, Vec::is_empty) {
        rows.pop();
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }

    tracing::debug!(rows = rows.len(), width, "normalized grid");
    rows
}
