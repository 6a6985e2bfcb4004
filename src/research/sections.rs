//! Splitting model output into report sections.

use crate::types::{AppError, EsgCategory, Result};

pub const NO_INFORMATION: &str = "No information found.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralSections {
    pub narrative: String,
    pub facility_summary: String,
    pub sustainability_summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GeneralSection {
    Narrative,
    Facility,
    Sustainability,
}

/// Heading text of a markdown heading (`## Title`) or a line that is
/// entirely bold (`**Title**`), lowercased and without numbering, trailing
/// colons or a qualifier such as `(Risk: Low)` or `- Medium risk`.
fn heading_text(line: &str) -> Option<String> {
    let line = line.trim();

    let raw = if line.starts_with('#') {
        line.trim_start_matches('#')
    } else if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        &line[2..line.len() - 2]
    } else {
        return None;
    };

    let text = raw
        .trim()
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
        .split(['(', ':'])
        .next()
        .unwrap_or_default();
    let text = text
        .split(" - ")
        .next()
        .and_then(|t| t.split(" – ").next())
        .unwrap_or_default()
        .trim()
        .trim_end_matches('*')
        .trim();

    (!text.is_empty()).then(|| text.to_lowercase())
}

fn general_section(heading: &str) -> Option<GeneralSection> {
    match heading {
        "narrative" | "research summary" | "company narrative" => Some(GeneralSection::Narrative),
        "facility summary" | "facilities summary" | "facilities" => Some(GeneralSection::Facility),
        "sustainability summary" | "sustainability" => Some(GeneralSection::Sustainability),
        _ => None,
    }
}

fn esg_section(heading: &str) -> Option<EsgCategory> {
    EsgCategory::ALL
        .iter()
        .find(|c| {
            heading == c.label().to_lowercase()
                || c.heading_aliases().iter().any(|alias| *alias == heading)
        })
        .copied()
}

/// Group lines under the recognised headings. Unrecognised headings stay in
/// the current section as content. Returns the preamble before the first
/// recognised heading separately.
fn split_sections<K: Copy + PartialEq>(
    text: &str,
    classify: impl Fn(&str) -> Option<K>,
) -> (String, Vec<(K, String)>) {
    let mut preamble: Vec<&str> = Vec::new();
    let mut sections: Vec<(K, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        match heading_text(line).and_then(|h| classify(&h)) {
            Some(key) => sections.push((key, Vec::new())),
            None => match sections.last_mut() {
                Some((_, lines)) => lines.push(line),
                None => preamble.push(line),
            },
        }
    }

    let joined = sections
        .into_iter()
        .map(|(key, lines)| (key, lines.join("\n").trim().to_string()))
        .collect();

    (preamble.join("\n").trim().to_string(), joined)
}

fn merge<K: PartialEq>(sections: &[(K, String)], key: K) -> String {
    sections
        .iter()
        .filter(|(k, body)| *k == key && !body.is_empty())
        .map(|(_, body)| body.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse the general summarization response.
///
/// Output without any recognised heading is taken whole as the narrative.
/// Blank output is malformed.
pub fn parse_general(text: &str) -> Result<GeneralSections> {
    if text.trim().is_empty() {
        return Err(AppError::SummarizationMalformed(
            "language model returned an empty summary".to_string(),
        ));
    }

    let (preamble, sections) = split_sections(text, general_section);

    if sections.is_empty() {
        return Ok(GeneralSections {
            narrative: text.trim().to_string(),
            ..Default::default()
        });
    }

    let narrative = [preamble, merge(&sections, GeneralSection::Narrative)]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let parsed = GeneralSections {
        narrative,
        facility_summary: merge(&sections, GeneralSection::Facility),
        sustainability_summary: merge(&sections, GeneralSection::Sustainability),
    };

    if parsed.narrative.is_empty()
        && parsed.facility_summary.is_empty()
        && parsed.sustainability_summary.is_empty()
    {
        return Err(AppError::SummarizationMalformed(
            "summary sections were all empty".to_string(),
        ));
    }

    Ok(parsed)
}

/// Parse the ESG response into one finding text per category, in category
/// order. At least one category heading must be present; skipped categories
/// get [`NO_INFORMATION`].
pub fn parse_esg(text: &str) -> Result<Vec<(EsgCategory, String)>> {
    let (_, sections) = split_sections(text, esg_section);

    if sections.is_empty() {
        return Err(AppError::SummarizationMalformed(
            "ESG analysis did not contain any category sections".to_string(),
        ));
    }

    Ok(EsgCategory::ALL
        .iter()
        .map(|category| {
            let body = merge(&sections, *category);
            let body = if body.is_empty() {
                NO_INFORMATION.to_string()
            } else {
                body
            };
            (*category, body)
        })
        .collect())
}
