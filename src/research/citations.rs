//! Citation numbering and inline marker handling.
//!
//! A [`CitationList`] assigns each unique source URL a 1-based number at
//! first insertion. Numbers never change afterwards, so the same number is
//! used in prompts, generated prose, JSON output and markdown output.

use crate::types::{Citation, SearchResult};
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Matches ` [3]`, `[1, 4]`, `[2;5]`, `[1-3]`, `[ 9 ]` and `[2, 9 and 12]`
/// style markers with an optional leading space. Ranges may use `-` or `–`.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"( ?)\[\s*(\d+(?:\s*(?:[,;\-–]|and)\s*\d+)*)\s*\]")
        .expect("citation marker regex is valid")
});

/// Wider ranges only contribute their endpoints.
const MAX_RANGE_SPAN: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct CitationList {
    entries: Vec<SearchResult>,
    by_url: HashMap<String, usize>,
}

impl CitationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a source, returning its citation number. A URL that is already
    /// present keeps its original number and first-seen metadata.
    pub fn insert(&mut self, result: SearchResult) -> usize {
        let key = url_key(&result.url);
        if let Some(&number) = self.by_url.get(&key) {
            return number;
        }

        self.entries.push(result);
        let number = self.entries.len();
        self.by_url.insert(key, number);
        number
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, number: usize) -> Option<&SearchResult> {
        number.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn contains(&self, number: usize) -> bool {
        (1..=self.entries.len()).contains(&number)
    }

    /// `(number, source)` pairs in citation order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &SearchResult)> {
        self.entries.iter().enumerate().map(|(i, r)| (i + 1, r))
    }

    pub fn to_citations(&self) -> Vec<Citation> {
        self.iter()
            .map(|(number, r)| Citation {
                number,
                title: r.title.clone(),
                url: r.url.clone(),
            })
            .collect()
    }
}

fn url_key(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Text with out-of-range markers removed, plus what was kept and dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckedText {
    pub text: String,
    pub cited: BTreeSet<usize>,
    pub dropped: BTreeSet<usize>,
}

/// Numbers too large for `usize` saturate to `usize::MAX`, which is never
/// a valid citation.
fn parse_number(raw: &str) -> usize {
    raw.trim().parse().unwrap_or(usize::MAX)
}

/// Every number a marker body refers to, with ranges expanded.
fn marker_numbers(body: &str) -> Vec<usize> {
    let mut numbers = Vec::new();
    for part in body.replace("and", ",").split([',', ';']) {
        match part.split_once(['-', '–']) {
            Some((lo, hi)) => {
                let (a, b) = (parse_number(lo), parse_number(hi));
                let (lo, hi) = (a.min(b), a.max(b));
                if hi - lo <= MAX_RANGE_SPAN {
                    numbers.extend(lo..=hi);
                } else {
                    numbers.extend([lo, hi]);
                }
            }
            None => numbers.push(parse_number(part)),
        }
    }
    numbers
}

/// Drop every citation number outside `1..=max` from `text`.
///
/// Markers whose numbers are all valid are left as written. Otherwise the
/// valid members are kept (`[1, 9]` and `[1-9]` become `[1]` when `max` is 1)
/// and a marker with no valid members is removed together with the space
/// before it, unless another marker follows directly.
pub fn check_markers(text: &str, max: usize) -> CheckedText {
    let mut cited = BTreeSet::new();
    let mut dropped = BTreeSet::new();

    let rewritten = MARKER_RE.replace_all(text, |caps: &Captures| {
        let mut kept = BTreeSet::new();
        let mut marker_dropped = false;
        for n in marker_numbers(&caps[2]) {
            if (1..=max).contains(&n) {
                kept.insert(n);
            } else {
                dropped.insert(n);
                marker_dropped = true;
            }
        }
        cited.extend(kept.iter().copied());

        if !marker_dropped {
            return caps[0].to_string();
        }
        if kept.is_empty() {
            let next_is_marker = caps
                .get(0)
                .is_some_and(|m| text[m.end()..].starts_with('['));
            return if next_is_marker {
                caps[1].to_string()
            } else {
                String::new()
            };
        }

        let kept: Vec<String> = kept.iter().map(|n| n.to_string()).collect();
        format!("{}[{}]", &caps[1], kept.join(", "))
    });

    CheckedText {
        text: rewritten.into_owned(),
        cited,
        dropped,
    }
}
