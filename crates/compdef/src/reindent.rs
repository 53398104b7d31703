//! Splices multi-line blocks into templates, keeping the template's
//! indentation.
//!
//! Each inserted block is wrapped into a pair of marker characters; after
//! the template is filled, every newline between the markers is followed by
//! the leading whitespace of the template line the block started on.

use crate::Result;

/// Unicode noncharacters, free for internal use.
const OPEN: char = '\u{FDD0}';
const CLOSE: char = '\u{FDD1}';

/// Replaces each `{key}` of `template` with the matching block.
///
/// Braces that do not name a key are kept as is.
pub fn render(template: &str, blocks: &[(&str, &str)]) -> Result<String> {
    check_markers(template)?;
    let mut buf = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        buf.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = after.find('}').and_then(|end| {
            let key = &after[..end];
            blocks.iter().find(|(it, _)| *it == key).map(|&(_, block)| (end, block))
        });
        match hit {
            Some((end, block)) => {
                check_markers(block)?;
                buf.push(OPEN);
                buf.push_str(block);
                buf.push(CLOSE);
                rest = &after[end + 1..];
            }
            None => {
                buf.push('{');
                rest = after;
            }
        }
    }
    buf.push_str(rest);
    Ok(fix_indent(&buf))
}

/// Indents the continuation lines of every marked span and drops the
/// markers. Text without markers comes back unchanged.
pub fn fix_indent(text: &str) -> String {
    let mut res = String::with_capacity(text.len());
    let mut line_ws = String::new();
    let mut at_line_start = true;
    let mut indent = String::new();
    let mut in_span = false;
    let mut pending = false;

    for c in text.chars() {
        match c {
            OPEN => {
                in_span = true;
                at_line_start = false;
                indent.clone_from(&line_ws);
            }
            CLOSE => in_span = false,
            '\n' => {
                res.push('\n');
                pending = in_span;
                if !in_span {
                    line_ws.clear();
                    at_line_start = true;
                }
            }
            _ => {
                if pending {
                    res.push_str(&indent);
                    pending = false;
                }
                if at_line_start {
                    if c == ' ' || c == '\t' {
                        line_ws.push(c);
                    } else {
                        at_line_start = false;
                    }
                }
                res.push(c);
            }
        }
    }
    res
}

fn check_markers(text: &str) -> Result<()> {
    if let Some(c) = text.chars().find(|&c| c == OPEN || c == CLOSE) {
        bail!("text contains reserved character U+{:04X}", c as u32);
    }
    Ok(())
}
