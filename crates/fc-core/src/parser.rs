//! Parser for the text interchange form → Scene.
//!
//! Built on `winnow` 0.7. The format is line-oriented and forgiving: any
//! line that does not match is skipped and reported, never fatal.
//!
//! Element lines are `<content> @@ (<x>, <y>, r<rot>, z<depth>)` with an
//! optional ` @@ <w>x<h>` suffix. Content is the longest prefix before a
//! ` @@ (` whose remainder matches, so content may itself contain ` @@ (`.
//! Numbers accept an optional `-` and fractional part; depth is an integer.
//! Kind is inferred from the content's extension.

use crate::emitter::LINKS_HEADER;
use crate::error::ParseSkipped;
use crate::model::{Element, ElementKind, Size};
use crate::scene::Scene;
use winnow::ascii::digit1;
use winnow::combinator::opt;
use winnow::prelude::*;

/// Opening of the placement block on an element line.
const PLACEMENT_OPEN: &str = " @@ (";

/// Outcome of parsing an interchange document.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub scene: Scene,
    /// Non-blank lines that were ignored, in input order.
    pub skipped: Vec<ParseSkipped>,
}

/// Parse an interchange document, silently dropping malformed lines.
#[must_use = "parsing result should be used"]
pub fn parse_text(input: &str) -> Scene {
    parse_text_report(input).scene
}

/// Parse an interchange document and report every skipped line.
#[must_use = "parsing result should be used"]
pub fn parse_text_report(input: &str) -> ParseReport {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let text = input.replace("\r\n", "\n");
    let marker = format!("{LINKS_HEADER}\n");
    let mut report = ParseReport::default();

    let (element_section, links_section) = match text.find(&marker) {
        Some(pos) => {
            let after = &text[pos + marker.len()..];
            // Anything past a second marker is ignored.
            let links = after.split(marker.as_str()).next().unwrap_or_default();
            (&text[..pos], Some((pos + marker.len(), links)))
        }
        None => (text.as_str(), None),
    };

    for (line_no, line) in section_lines(&text, 0, element_section) {
        let added = parse_element_line(line)
            .is_some_and(|element| report.scene.add_element(element).is_ok());
        if !added {
            skip(&mut report, line_no, line);
        }
    }

    if let Some((offset, section)) = links_section {
        for (line_no, line) in section_lines(&text, offset, section) {
            let linked = parse_link_line(line)
                .is_some_and(|(a, b)| report.scene.link_indices(a, b).is_ok());
            if !linked {
                skip(&mut report, line_no, line);
            }
        }
    }

    log::debug!(
        "parser: {} element(s), {} link(s), {} skipped",
        report.scene.len(),
        report.scene.links().len(),
        report.skipped.len()
    );
    report
}

fn skip(report: &mut ParseReport, line: usize, text: &str) {
    if text.trim().is_empty() {
        return;
    }
    log::trace!("parser: skip line {line}: {text:?}");
    report.skipped.push(ParseSkipped {
        line,
        text: text.to_string(),
    });
}

/// Trim a section and yield its lines with 1-based line numbers relative to
/// the whole document. `offset` is the section's byte offset in `text`.
fn section_lines<'a>(
    text: &str,
    offset: usize,
    section: &'a str,
) -> impl Iterator<Item = (usize, &'a str)> {
    let leading = section.len() - section.trim_start().len();
    let first_line = text[..offset + leading].matches('\n').count() + 1;
    let trimmed = section.trim();
    trimmed
        .split('\n')
        .enumerate()
        .filter(move |_| !trimmed.is_empty())
        .map(move |(i, line)| (first_line + i, line))
}

// ─── Element lines ───────────────────────────────────────────────────────

/// Parse one element line. Tries each ` @@ (` from the right so the content
/// is the longest prefix that still leaves a valid placement.
pub fn parse_element_line(line: &str) -> Option<Element> {
    line.rmatch_indices(PLACEMENT_OPEN)
        .filter(|(pos, _)| *pos > 0)
        .find_map(|(pos, _)| {
            let mut rest = &line[pos + PLACEMENT_OPEN.len()..];
            let (x, y, rotation, depth) = parse_placement.parse_next(&mut rest).ok()?;
            let size = opt(parse_size).parse_next(&mut rest).ok()?;
            let content = &line[..pos];

            let mut element = Element::new(ElementKind::infer(content), content, x, y)
                .with_rotation(rotation)
                .with_depth(depth);
            element.size = size;
            Some(element)
        })
}

/// `<x>, <y>, r<rotation>, z<depth>)`
fn parse_placement(input: &mut &str) -> ModalResult<(f64, f64, f64, i64)> {
    let x = parse_number.parse_next(input)?;
    let _ = ", ".parse_next(input)?;
    let y = parse_number.parse_next(input)?;
    let _ = ", r".parse_next(input)?;
    let rotation = parse_number.parse_next(input)?;
    let _ = ", z".parse_next(input)?;
    let depth = parse_integer.parse_next(input)?;
    let _ = ')'.parse_next(input)?;
    Ok((x, y, rotation, depth))
}

/// ` @@ <width>x<height>`
fn parse_size(input: &mut &str) -> ModalResult<Size> {
    let _ = " @@ ".parse_next(input)?;
    let width = parse_number.parse_next(input)?;
    let _ = 'x'.parse_next(input)?;
    let height = parse_number.parse_next(input)?;
    Ok(Size::new(width, height))
}

/// Optional `-`, digits, optional `.digits`.
fn parse_number(input: &mut &str) -> ModalResult<f64> {
    (opt('-'), digit1, opt(('.', digit1)))
        .take()
        .try_map(str::parse::<f64>)
        .parse_next(input)
}

/// Optional `-`, digits.
fn parse_integer(input: &mut &str) -> ModalResult<i64> {
    (opt('-'), digit1)
        .take()
        .try_map(str::parse::<i64>)
        .parse_next(input)
}

// ─── Link lines ──────────────────────────────────────────────────────────

/// Parse `<a> -> <b>`. Extra ` -> ` segments after the second are ignored.
pub fn parse_link_line(line: &str) -> Option<(usize, usize)> {
    let mut parts = line.split(" -> ");
    let a = parts.next()?.trim().parse().ok()?;
    let b = parts.next()?.trim().parse().ok()?;
    Some((a, b))
}
