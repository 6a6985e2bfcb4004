//! Prompt templates for the summarization passes.
//!
//! Both prompts list sources under their frozen citation numbers and state
//! the valid range, so the model has no reason to invent numbers. Whatever it
//! produces is still checked by the assembler.

use crate::research::citations::CitationList;
use crate::types::EsgCategory;

/// Snippet characters included per source.
const SNIPPET_CHARS: usize = 500;

pub const GENERAL_SYSTEM_PROMPT: &str = r#"You are an expert business analyst writing company research summaries.

Use only the numbered sources you are given. Support every factual statement with an inline citation marker such as [1] or [2, 5], using only the source numbers listed. If information is missing, say so plainly instead of guessing. Write in English, in a professional tone.

Structure your answer with exactly these markdown headings:

## Narrative
Company overview, business activities, financial information if available, key personnel and partners, recent developments and a short assessment.

## Facility Summary
Known facilities, plants, offices and their locations.

## Sustainability Summary
Sustainability, environmental and social commitments or reporting found in the sources."#;

pub const ESG_SYSTEM_PROMPT: &str = r#"You are an ESG (environmental, social and governance) analyst.

Evaluate the company for each ESG category using only the numbered sources you are given. For every category summarise the concrete findings, state clearly when information is missing, and give a risk level (Low / Medium / High). Support each statement with inline citation markers such as [3], using only the source numbers listed. Write in English.

Write one markdown section per category, with the category name as a level-3 heading (### Category Name), in the order given."#;

/// Request facts shared by both prompts.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub company_name: &'a str,
    pub company_url: Option<&'a str>,
    pub keywords: &'a [&'a str],
    pub partners: &'a [&'a str],
}

impl PromptContext<'_> {
    fn header(&self) -> String {
        format!(
            "Company: {}\nCompany URL: {}\nKeywords: {}\nPartners/Founders: {}",
            self.company_name,
            self.company_url.unwrap_or("Not provided"),
            join_or(self.keywords, "None"),
            join_or(self.partners, "None"),
        )
    }
}

fn join_or(items: &[&str], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

fn range_note(citations: &CitationList) -> String {
    if citations.is_empty() {
        "No sources are available; do not use citation markers.".to_string()
    } else {
        format!(
            "Valid citation numbers are 1 to {}. Do not cite any other number.",
            citations.len()
        )
    }
}

/// Render the given citation numbers as a numbered source block.
pub fn format_sources(citations: &CitationList, numbers: &[usize]) -> String {
    let blocks: Vec<String> = numbers
        .iter()
        .filter_map(|&n| citations.get(n).map(|r| (n, r)))
        .map(|(n, r)| {
            let snippet: String = r.snippet.chars().take(SNIPPET_CHARS).collect();
            let ellipsis = if r.snippet.chars().count() > SNIPPET_CHARS {
                "..."
            } else {
                ""
            };
            format!(
                "[{}] {}\nURL: {}\nContent: {}{}",
                n, r.title, r.url, snippet, ellipsis
            )
        })
        .collect();

    if blocks.is_empty() {
        "No sources found.".to_string()
    } else {
        blocks.join("\n\n")
    }
}

pub fn general_prompt(
    context: &PromptContext<'_>,
    citations: &CitationList,
    numbers: &[usize],
) -> String {
    format!(
        "{}\n\n{}\n\nSources:\n\n{}\n\nWrite the research summary for {} using the three required sections.",
        context.header(),
        range_note(citations),
        format_sources(citations, numbers),
        context.company_name,
    )
}

/// ESG prompt with a source block per category, in category order.
pub fn esg_prompt(
    context: &PromptContext<'_>,
    citations: &CitationList,
    by_category: &[(EsgCategory, Vec<usize>)],
) -> String {
    let sections: Vec<String> = by_category
        .iter()
        .map(|(category, numbers)| {
            format!(
                "### {} ({})\n\n{}",
                category.label(),
                category.description(),
                format_sources(citations, numbers)
            )
        })
        .collect();

    let order: Vec<&str> = EsgCategory::ALL.iter().map(|c| c.label()).collect();

    format!(
        "{}\n\n{}\n\nSources by category:\n\n{}\n\nWrite the ESG analysis for {} with these sections in order: {}.",
        context.header(),
        range_note(citations),
        sections.join("\n\n"),
        context.company_name,
        order.join(", "),
    )
}
