use crate::types::{EsgCategory, PlannedQuery, QueryPurpose, ResearchRequest, Result};

/// Maximum number of partners combined into the management query.
const MAX_PARTNERS_IN_QUERY: usize = 3;

/// Build the ordered search plan for a request.
///
/// General queries come first, then exactly one query per ESG category in
/// [`EsgCategory::ALL`] order when ESG analysis is requested. Queries are
/// always written in English regardless of the company's locale.
pub fn plan_queries(request: &ResearchRequest) -> Result<Vec<PlannedQuery>> {
    let name = request.validated_name()?.replace('"', "");
    let keywords = request.clean_keywords();
    let partners = request.clean_partners();

    let suffix = if keywords.is_empty() {
        String::new()
    } else {
        format!(" {}", keywords.join(" "))
    };

    let mut queries = vec![
        general(format!("\"{}\" company profile business overview{}", name, suffix)),
        general(format!("\"{}\" latest news developments{}", name, suffix)),
    ];

    if let Some(domain) = request.company_url.as_deref().and_then(extract_domain) {
        queries.push(general(format!("site:{} about company{}", domain, suffix)));
    }

    if !partners.is_empty() {
        let quoted: Vec<String> = partners
            .iter()
            .take(MAX_PARTNERS_IN_QUERY)
            .map(|p| format!("\"{}\"", p.replace('"', "")))
            .collect();
        queries.push(general(format!(
            "\"{}\" {} management board{}",
            name,
            quoted.join(" "),
            suffix
        )));
    }

    if request.include_esg_analysis {
        queries.extend(EsgCategory::ALL.iter().map(|category| PlannedQuery {
            query: format!("\"{}\" {}", name, category.search_terms()),
            purpose: QueryPurpose::Esg(*category),
        }));
    }

    Ok(queries)
}

fn general(query: String) -> PlannedQuery {
    PlannedQuery {
        query,
        purpose: QueryPurpose::General,
    }
}

/// Host of a company URL with any leading `www.` removed.
///
/// Returns `None` for input that does not resolve to a dotted host name, so
/// malformed URLs are treated as if no URL was given.
pub fn extract_domain(url: &str) -> Option<String> {
    let url = url.trim();
    let parsed = reqwest::Url::parse(url)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| reqwest::Url::parse(&format!("https://{}", url)).ok())?;

    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host.contains('.') && !host.starts_with('.') && !host.ends_with('.') {
        Some(host.to_string())
    } else {
        None
    }
}
