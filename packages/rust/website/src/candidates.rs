//! Candidate link filtering and term-match scoring.

/// Scoring rules for one company's search results.
#[derive(Debug, Clone)]
pub(crate) struct CandidatePolicy<'a> {
    /// Lower-cased, whitespace-split company name.
    terms: Vec<String>,
    threshold: f64,
    max_candidates: usize,
    denylist: &'a [String],
}

impl<'a> CandidatePolicy<'a> {
    pub(crate) fn new(
        company: &str,
        threshold: f64,
        max_candidates: usize,
        denylist: &'a [String],
    ) -> Self {
        Self {
            terms: company_terms(company),
            threshold,
            max_candidates,
            denylist,
        }
    }

    /// Pick the first acceptable link among the top `max_candidates` hrefs.
    ///
    /// `hrefs` is in ranking order; `None` stands for an anchor without href.
    pub(crate) fn pick<'h>(&self, hrefs: impl IntoIterator<Item = Option<&'h str>>) -> Option<String> {
        hrefs
            .into_iter()
            .take(self.max_candidates)
            .filter_map(|href| clean_candidate(href?, self.denylist))
            .find(|url| self.accepts(url))
    }

    fn accepts(&self, url: &str) -> bool {
        meets_threshold(term_score(&self.terms, url), self.terms.len(), self.threshold)
    }
}

pub(crate) fn company_terms(company: &str) -> Vec<String> {
    company.to_lowercase().split_whitespace().map(String::from).collect()
}

/// Normalize an href, or reject it.
///
/// Rejects empty and denylisted links, strips the query string and
/// surrounding slashes, and keeps only absolute http(s) links.
pub(crate) fn clean_candidate(href: &str, denylist: &[String]) -> Option<String> {
    let href = href.trim().to_lowercase();
    if href.is_empty() {
        return None;
    }
    if denylist.iter().any(|d| href.contains(&d.to_lowercase())) {
        return None;
    }

    let without_query = href.split('?').next().unwrap_or_default();
    let cleaned = without_query.trim_matches('/');

    if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// Number of company terms that occur in `url`.
pub(crate) fn term_score(terms: &[String], url: &str) -> usize {
    terms.iter().filter(|t| url.contains(t.as_str())).count()
}

/// `score >= threshold * term_count`, compared unrounded.
pub(crate) fn meets_threshold(score: usize, term_count: usize, threshold: f64) -> bool {
    score as f64 >= threshold * term_count as f64
}
