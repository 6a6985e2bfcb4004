//! Report assembly and markdown rendering.

use crate::research::citations::{CitationList, check_markers};
use crate::research::sections::GeneralSections;
use crate::types::{EsgCategory, EsgFinding, ResearchReport, ResearchStats};
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Everything the assembler merges into a [`ResearchReport`].
pub struct ReportParts {
    pub request_id: Uuid,
    pub company_name: String,
    pub partners: Vec<String>,
    pub general: GeneralSections,
    /// `None` when ESG analysis was not requested
    pub esg: Option<Vec<(EsgCategory, String)>>,
    pub citations: CitationList,
    pub stats: ResearchStats,
}

/// Merge the parsed sections with the frozen citation list.
///
/// Citation markers outside the list are removed from every text field and
/// reported in `unmatched_citations`.
pub fn assemble(parts: ReportParts) -> ResearchReport {
    let max = parts.citations.len();
    let mut dropped = BTreeSet::new();

    let mut checked = |text: &str| {
        let result = check_markers(text, max);
        dropped.extend(result.dropped.iter().copied());
        result
    };

    let narrative = checked(&parts.general.narrative).text;
    let facility_summary = checked(&parts.general.facility_summary).text;
    let sustainability_summary = checked(&parts.general.sustainability_summary).text;

    let esg_findings = parts.esg.map(|findings| {
        findings
            .into_iter()
            .map(|(category, text)| {
                let result = checked(&text);
                EsgFinding {
                    category,
                    finding: result.text,
                    citations: result.cited.into_iter().collect(),
                }
            })
            .collect::<Vec<_>>()
    });

    if !dropped.is_empty() {
        tracing::warn!(
            "Dropped {} out-of-range citation number(s) {:?} (valid range 1..={})",
            dropped.len(),
            dropped,
            max
        );
    }

    ResearchReport {
        request_id: parts.request_id,
        company_name: parts.company_name,
        partners: parts.partners,
        narrative,
        facility_summary,
        sustainability_summary,
        esg_findings,
        citations: parts.citations.to_citations(),
        unmatched_citations: dropped.into_iter().collect(),
        stats: parts.stats,
        generated_at: Utc::now(),
    }
}

fn push_section(out: &mut Vec<String>, heading: &str, body: &str) {
    out.push(format!("## {}", heading));
    out.push(String::new());
    out.push(if body.trim().is_empty() {
        "No information available.".to_string()
    } else {
        body.trim().to_string()
    });
    out.push(String::new());
}

/// Render a report as a markdown document.
///
/// Citations use the same numbers as the JSON form: one `[n] title` line
/// followed by the URL on the next line.
pub fn render_markdown(report: &ResearchReport) -> String {
    let mut out = vec![format!("# Company Research: {}", report.company_name), String::new()];

    if !report.partners.is_empty() {
        out.push(format!("**Partners:** {}", report.partners.join(", ")));
        out.push(String::new());
    }

    push_section(&mut out, "Research Summary", &report.narrative);
    push_section(&mut out, "Facility Summary", &report.facility_summary);
    push_section(&mut out, "Sustainability Summary", &report.sustainability_summary);

    if let Some(findings) = &report.esg_findings {
        out.push("## ESG Analysis".to_string());
        out.push(String::new());
        for finding in findings {
            out.push(format!("### {}", finding.category.label()));
            out.push(String::new());
            out.push(finding.finding.trim().to_string());
            out.push(String::new());
        }
    }

    out.push("## Citations".to_string());
    out.push(String::new());
    if report.citations.is_empty() {
        out.push("No sources.".to_string());
        out.push(String::new());
    }
    for citation in &report.citations {
        out.push(format!("[{}] {}", citation.number, citation.title));
        out.push(citation.url.clone());
        out.push(String::new());
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchResult;

    fn stats() -> ResearchStats {
        ResearchStats {
            total_queries: 1,
            failed_queries: 0,
            total_results: 2,
            unique_sources: 2,
            duration_ms: 5,
            queries: vec![],
        }
    }

    fn parts(esg: Option<Vec<(EsgCategory, String)>>) -> ReportParts {
        let mut citations = CitationList::new();
        citations.insert(SearchResult::new("Acme profile", "https://a.example", "..."));
        citations.insert(SearchResult::new("Acme news", "https://b.example", "..."));

        ReportParts {
            request_id: Uuid::new_v4(),
            company_name: "Acme Inc".to_string(),
            partners: vec!["Jane Doe".to_string()],
            general: GeneralSections {
                narrative: "Acme makes anvils [1]. It was sold [5].".to_string(),
                facility_summary: "Plant in Springfield [2].".to_string(),
                sustainability_summary: String::new(),
            },
            esg,
            citations,
            stats: stats(),
        }
    }

    #[test]
    fn test_assemble_drops_unmatched_markers() {
        let report = assemble(parts(None));

        assert_eq!(report.narrative, "Acme makes anvils [1]. It was sold.");
        assert_eq!(report.unmatched_citations, vec![5]);
        assert_eq!(report.citations.len(), 2);
        assert!(report.esg_findings.is_none());
    }

    #[test]
    fn test_esg_findings_collect_citations() {
        let esg = vec![
            (EsgCategory::FacilityLocations, "Springfield [2][1] and [2].".to_string()),
            (EsgCategory::ClimateAction, "Nothing [9].".to_string()),
        ];
        let report = assemble(parts(Some(esg)));
        let findings = report.esg_findings.unwrap();

        assert_eq!(findings[0].citations, vec![1, 2]);
        assert!(findings[1].citations.is_empty());
        assert_eq!(findings[1].finding, "Nothing.");
        assert_eq!(report.unmatched_citations, vec![5, 9]);
    }

    #[test]
    fn test_markdown_sections_and_citations() {
        let report = assemble(parts(None));
        let markdown = render_markdown(&report);

        assert!(markdown.starts_with("# Company Research: Acme Inc"));
        assert!(markdown.contains("## Research Summary"));
        assert!(markdown.contains("## Facility Summary"));
        assert!(!markdown.contains("## ESG Analysis"));
        assert!(markdown.contains("[1] Acme profile\nhttps://a.example"));
        assert!(markdown.contains("[2] Acme news\nhttps://b.example"));
    }

    #[test]
    fn test_markdown_esg_section_in_category_order() {
        let esg = EsgCategory::ALL
            .iter()
            .map(|c| (*c, format!("{} finding [1].", c.label())))
            .collect();
        let markdown = render_markdown(&assemble(parts(Some(esg))));

        let positions: Vec<usize> = EsgCategory::ALL
            .iter()
            .map(|c| markdown.find(&format!("### {}", c.label())).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
