//! Marker scanner
//!
//! Splits a template into literal separators and expression sources. Escaped
//! marker regions are kept as literal text and converted back to plain
//! markers when a separator is emitted.

use super::markers::Markers;

/// Result of scanning a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ScanResult {
    /// Literal pieces, always `expressions.len() + 1` long
    pub separators: Vec<String>,
    /// Raw expression sources found between markers
    pub expressions: Vec<String>,
    /// Whether any non-empty literal text surrounds the expressions
    pub has_text: bool,
}

impl ScanResult {
    /// Whether at least one marker pair was found
    pub fn has_interpolation(&self) -> bool {
        !self.expressions.is_empty()
    }
}

pub(crate) fn scan(text: &str, markers: &Markers) -> ScanResult {
    let start = markers.start();
    let end = markers.end();
    let escape = markers.escape_pair();
    let similar = markers.similar_start_symbols();
    let len = text.len();

    let mut result = ScanResult::default();
    let mut index = 0;
    let mut cursor: Option<usize> = None;
    let mut escaped = escape.is_some();
    let mut escaped_start: Option<usize> = None;
    let mut escaped_end: Option<usize> = None;

    while index < len {
        let i = *cursor.get_or_insert(index);

        if escaped {
            if let Some((escape_start, escape_end)) = escape {
                escaped_start = index_of(text, escape_start, i);
                match escaped_start {
                    Some(found) => {
                        escaped_end = index_of(text, escape_end, found + escape_start.len())
                            .map(|e| e + escape_end.len());
                        if escaped_end.is_none() {
                            escaped = false;
                        }
                    }
                    None => escaped = false,
                }
            }
        }

        let start_index = index_of(text, start, i);
        let end_index = start_index.and_then(|s| index_of(text, end, s + start.len()));

        let (Some(mut marker_start), Some(marker_end)) = (start_index, end_index) else {
            push_remainder(&mut result, text, index, markers);
            break;
        };

        // Region covered by the current escape window, if any
        let window = match (escaped, escaped_start, escaped_end) {
            (true, Some(s), Some(e)) => Some((s, e)),
            _ => None,
        };
        let overlapping = window.filter(|&(window_start, window_end)| {
            window_end > marker_start && window_start < marker_end + end.len()
        });

        if let Some((_, window_end)) = overlapping {
            // The marker pair sits inside escaped text; resume after the window
            cursor = Some(window_end);
        } else {
            if escaped_end.is_none() && similar {
                if let Some((escape_start, _)) = escape {
                    while escaped_start == Some(marker_start)
                        && index_of(text, start, marker_start) == Some(marker_start)
                    {
                        marker_start += start.len();
                        escaped_start = index_of(text, escape_start, marker_start + start.len());
                    }
                }
            }

            if index != marker_start {
                result.has_text = true;
            }
            result
                .separators
                .push(unescape(substring(text, index, marker_start), markers));
            result
                .expressions
                .push(substring(text, marker_start + start.len(), marker_end).to_string());
            index = marker_end + end.len();
            cursor = None;
        }
    }

    if result.separators.len() == result.expressions.len() {
        result.separators.push(String::new());
    }

    result
}

fn push_remainder(result: &mut ScanResult, text: &str, index: usize, markers: &Markers) {
    if index != text.len() {
        result.has_text = true;
        result
            .separators
            .push(unescape(substring(text, index, text.len()), markers));
    }
}

/// Replace every complete escaped marker pair with the plain markers
pub(crate) fn unescape(text: &str, markers: &Markers) -> String {
    let Some((escape_start, escape_end)) = markers.escape_pair() else {
        return text.to_string();
    };

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < text.len() {
        let pair = index_of(text, escape_start, i).and_then(|s| {
            index_of(text, escape_end, s + escape_start.len()).map(|e| (s, e))
        });
        match pair {
            Some((s, e)) => {
                out.push_str(&text[i..s]);
                out.push_str(markers.start());
                out.push_str(&text[s + escape_start.len()..e]);
                out.push_str(markers.end());
                i = e + escape_end.len();
            }
            None => {
                out.push_str(&text[i..]);
                break;
            }
        }
    }
    out
}

/// Byte offset of `pattern` in `text` at or after `from`
fn index_of(text: &str, pattern: &str, from: usize) -> Option<usize> {
    let from = ceil_char_boundary(text, from);
    text.get(from..)?.find(pattern).map(|pos| pos + from)
}

/// Substring between two offsets, swapped when given in reverse order
fn substring(text: &str, a: usize, b: usize) -> &str {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let lo = ceil_char_boundary(text, lo);
    let hi = ceil_char_boundary(text, hi);
    text.get(lo..hi).unwrap_or_default()
}

fn ceil_char_boundary(text: &str, mut offset: usize) -> usize {
    if offset >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}
