//! Text transform applied to matched pages: section selection, then markup
//! stripping. Pure with respect to shared state; a failure here is isolated
//! to the page being transformed.

pub mod markup;

use anyhow::Result;
use log::trace;

/// Transform raw wikitext into plain text. Summary mode keeps only the lead
/// section; fulltext keeps every section except reference-style ones.
pub fn transform_text(title: &str, raw: &str, fulltext: bool) -> Result<String> {
    trace!("transforming text for {title:?} (fulltext={fulltext})");
    let selected = select_sections(raw, fulltext);
    Ok(markup::strip_markup(&selected))
}

/// Keep the lead section, plus (in fulltext mode) every section not titled
/// References / See also / External links. Headings themselves are dropped.
/// Subsections follow their parent's fate.
pub fn select_sections(raw: &str, fulltext: bool) -> String {
    let mut out = String::new();
    let mut skipping_level: Option<usize> = None;
    for line in raw.lines() {
        if let Some((level, heading)) = parse_heading(line) {
            if let Some(skip) = skipping_level
                && level > skip
            {
                continue;
            }
            skipping_level = if fulltext && !is_excluded_heading(heading) {
                None
            } else {
                Some(level)
            };
            continue;
        }
        if skipping_level.is_none() {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

/// Sections whose content is reference apparatus, not article prose.
fn is_excluded_heading(heading: &str) -> bool {
    heading.eq_ignore_ascii_case("references")
        || heading.eq_ignore_ascii_case("reference")
        || heading.eq_ignore_ascii_case("see also")
        || heading.eq_ignore_ascii_case("external links")
}

/// `== Heading ==` lines. Returns (level, inner title); level 2 is a
/// top-level article section.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let t = line.trim();
    if t.len() < 5 || !t.starts_with("==") || !t.ends_with("==") {
        return None;
    }
    let leading = t.bytes().take_while(|&b| b == b'=').count();
    let trailing = t.bytes().rev().take_while(|&b| b == b'=').count();
    if leading + trailing >= t.len() {
        return None;
    }
    let inner = t[leading..t.len() - trailing].trim();
    Some((leading.min(trailing), inner))
}
