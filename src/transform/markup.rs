//! Wikitext to plain text. Bracketed constructs that nest (templates,
//! links) get character scans; flat patterns use cached regexes.

use regex_lite::Regex;
use std::sync::OnceLock;

static RE_EXTERNAL_LINK: OnceLock<Regex> = OnceLock::new();
static RE_EXTERNAL_BARE: OnceLock<Regex> = OnceLock::new();
static RE_MAGIC_WORDS: OnceLock<Regex> = OnceLock::new();

/// Strip MediaWiki markup from `text` and collapse whitespace. The result
/// is a single line of prose.
pub fn strip_markup(text: &str) -> String {
    let mut out = strip_comments(text);
    out = strip_refs(&out);
    out = strip_templates(&out);
    out = strip_table_lines(&out);
    out = process_internal_links(&out);
    out = process_external_links(&out);
    out = strip_quotes(&out);
    out = strip_magic_words(&out);
    collapse_whitespace(&out)
}

/// Drop `<!-- ... -->`. An unterminated comment eats the rest of the text.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        match rest[start..].find("-->") {
            Some(end) => rest = &rest[start + end + 3..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Drop `<ref .../>` and `<ref ...>...</ref>` including their contents.
fn strip_refs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let Some(start) = find_ref_open(rest) else {
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(gt) = tail.find('>') else {
            // Unterminated tag; keep the remainder as-is.
            out.push_str(tail);
            return out;
        };
        if tail[..gt].ends_with('/') {
            rest = &tail[gt + 1..];
            continue;
        }
        match find_ref_close(&tail[gt + 1..]) {
            Some(after) => rest = &tail[gt + 1 + after..],
            None => return out,
        }
    }
}

fn find_ref_open(text: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find("<ref") {
        let at = from + pos;
        // Reject e.g. "<refugees"; a real tag continues with '>', '/' or an attribute.
        match lower.as_bytes().get(at + 4) {
            Some(b'>') | Some(b' ') | Some(b'/') | Some(b'\t') | Some(b'\n') => return Some(at),
            _ => from = at + 4,
        }
    }
    None
}

/// Offset just past the `</ref ... >` closing tag, relative to `text`.
fn find_ref_close(text: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    let close = lower.find("</ref")?;
    let gt = lower[close..].find('>')?;
    Some(close + gt + 1)
}

/// Remove `{{ ... }}` templates, tracking nesting depth.
fn strip_templates(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let bytes = text.as_bytes();
    let mut depth = 0_usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i..].starts_with(b"{{") {
            depth += 1;
            i += 2;
        } else if depth > 0 && bytes[i..].starts_with(b"}}") {
            depth -= 1;
            i += 2;
        } else {
            if depth == 0 {
                let ch_len = utf8_len(bytes[i]);
                out.push_str(&text[i..i + ch_len]);
                i += ch_len;
                continue;
            }
            i += utf8_len(bytes[i]);
        }
    }
    out
}

fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b < 0xE0 => 2,
        b if b < 0xF0 => 3,
        _ => 4,
    }
}

/// Drop table markup lines (`{|`, `|}`, `|-`, `|...`, `!...`).
fn strip_table_lines(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let t = line.trim_start();
            !(t.starts_with("{|")
                || t.starts_with("|}")
                || t.starts_with("|-")
                || t.starts_with('|')
                || t.starts_with('!'))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve `[[link]]` and `[[link|label]]` to their display text; drop
/// category, file and image links whole, nested brackets included.
fn process_internal_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("[[") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = matching_close(tail) else {
            // No closing brackets; emit the rest verbatim.
            out.push_str(tail);
            return out;
        };
        let inner = &tail[2..end];
        if !is_dropped_link(inner) {
            let resolved = process_internal_links(inner);
            let display = resolved.rsplit('|').next().unwrap_or("").trim();
            out.push_str(display);
        }
        rest = &tail[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Byte offset of the `]]` matching the `[[` at the start of `text`.
fn matching_close(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0_usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'[' && bytes[i + 1] == b'[' {
            depth += 1;
            i += 2;
        } else if bytes[i] == b']' && bytes[i + 1] == b']' {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}

fn is_dropped_link(inner: &str) -> bool {
    let target = inner.trim_start();
    ["category:", "file:", "image:"].iter().any(|prefix| {
        target
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// `[url label]` keeps the label; bare `[url]` disappears.
fn process_external_links(text: &str) -> String {
    let re_link = RE_EXTERNAL_LINK
        .get_or_init(|| Regex::new(r"\[(?:https?|ftp)://[^\s\]]+\s+([^\]]*)\]").unwrap());
    let text = re_link.replace_all(text, "$1");
    let re_bare =
        RE_EXTERNAL_BARE.get_or_init(|| Regex::new(r"\[(?:https?|ftp)://[^\s\]]+\]").unwrap());
    re_bare.replace_all(&text, "").into_owned()
}

/// Bold/italic quote runs carry no content.
fn strip_quotes(text: &str) -> String {
    text.replace("'''''", "")
        .replace("'''", "")
        .replace("''", "")
}

fn strip_magic_words(text: &str) -> String {
    let re = RE_MAGIC_WORDS.get_or_init(|| Regex::new(r"__[A-Z]+__").unwrap());
    re.replace_all(text, "").into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
