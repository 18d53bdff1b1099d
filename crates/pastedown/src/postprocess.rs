//! Markdown cleanup applied after the rule engine.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::detect_language;

/// Three or more newlines, possibly with whitespace between them
static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("blank run pattern is valid"));

/// Normalize converted Markdown.
///
/// Collapses blank-line runs into a single blank line, trims the result and
/// undoes the escaping of `*`, `[` and `]`, which pasted prose rarely means
/// literally.
pub fn post_process(markdown: &str) -> String {
    let collapsed = BLANK_RUN.replace_all(markdown, "\n\n");
    collapsed
        .trim()
        .replace(r"\*", "*")
        .replace(r"\[", "[")
        .replace(r"\]", "]")
        .trim()
        .to_string()
}

/// An opening code fence: marker character, run length and info string
struct Fence<'a> {
    marker: char,
    len: usize,
    info: &'a str,
}

/// A line split into its blockquote markers and the text after them
struct Quoted<'a> {
    depth: usize,
    body: &'a str,
}

fn split_quote(line: &str) -> Quoted<'_> {
    let mut depth = 0;
    let mut rest = line;
    while let Some(after) = rest.trim_start().strip_prefix('>') {
        depth += 1;
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    Quoted { depth, body: rest }
}

/// Strip exactly `depth` blockquote markers, or `None` if the line has fewer
fn strip_quotes(line: &str, depth: usize) -> Option<&str> {
    let mut rest = line;
    for _ in 0..depth {
        let after = rest.trim_start().strip_prefix('>')?;
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    Some(rest)
}

fn opening_fence(line: &str) -> Option<Fence<'_>> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    let info = trimmed[len..].trim();
    if marker == '`' && info.contains('`') {
        return None;
    }
    Some(Fence { marker, len, info })
}

fn closes(line: &str, fence: &Fence) -> bool {
    let trimmed = line.trim();
    let len = trimmed.chars().take_while(|c| *c == fence.marker).count();
    len >= fence.len && len == trimmed.chars().count()
}

/// Fill in the info string of fenced code blocks that have none.
///
/// Fences inside blockquotes are found at any quote depth. A block counts
/// only once its closing fence is found at the same depth, so a bare run of
/// backticks or tildes in prose is never labelled. The body of each
/// unlabelled block goes through [`detect_language`]; blocks detected as
/// plain text keep their bare fence.
pub fn label_code_fences(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    let mut i = 0;

    while i < lines.len() {
        let Quoted { depth, body } = split_quote(lines[i]);
        let Some(fence) = opening_fence(body) else {
            i += 1;
            continue;
        };

        // Body lines sit under the same quote markers as the opening fence
        let inner: Vec<&str> = lines[i + 1..]
            .iter()
            .map_while(|line| strip_quotes(line, depth))
            .collect();
        let Some(close) = inner.iter().position(|line| closes(line, &fence)) else {
            i += 1;
            continue;
        };

        if fence.info.is_empty() {
            let body = &inner[..close];
            let label = detect_language(&body.join("\n"));
            if label.is_known() {
                out[i] = format!("{}{}", lines[i].trim_end(), label);
            }
        }
        i += close + 2;
    }

    out.join("\n")
}
