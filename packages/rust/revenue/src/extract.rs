//! Revenue figure extraction from company pages.
//!
//! Pages are unstructured, so extraction is a layered pattern search: list
//! items mentioning "revenue" first, then the whole page text. Patterns are
//! tried in a fixed order and the first hit wins.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Phrases that mark a page as "no such company".
const NOT_FOUND_PHRASES: [&str; 3] = ["page not found", "company not found", "rank not available"];

/// Revenue patterns, most specific first.
static REVENUE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)estimated annual revenue[:\s]*([\$\d\.]+[KMB]?)")
            .expect("estimated revenue regex"),
        Regex::new(r"(?i)revenue[:\s]*([\$\d\.]+[KMB]?)").expect("revenue regex"),
        Regex::new(r"(?i)([\$\d\.]+[KMB]?)[\s]*annual revenue").expect("annual revenue regex"),
    ]
});

static LIST_ITEM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("li selector"));

/// A parsed company page.
pub(crate) struct CompanyPage {
    doc: Html,
    /// Lower-cased text of the whole document.
    text: String,
}

impl CompanyPage {
    pub(crate) fn parse(html: &str) -> Self {
        let doc = Html::parse_document(html);
        let text = doc.root_element().text().collect::<String>().to_lowercase();
        Self { doc, text }
    }

    /// Whether the site rendered its "no such company" page.
    pub(crate) fn is_not_found(&self) -> bool {
        NOT_FOUND_PHRASES.iter().any(|p| self.text.contains(p))
    }

    /// Find the raw revenue figure, list items first, then the page text.
    pub(crate) fn revenue_figure(&self) -> Option<String> {
        self.from_list_items().or_else(|| first_pattern_match(&self.text))
    }

    fn from_list_items(&self) -> Option<String> {
        self.doc
            .select(&LIST_ITEM_SEL)
            .map(|li| li.text().map(str::trim).collect::<String>())
            .filter(|text| text.to_lowercase().contains("revenue"))
            .find_map(|text| first_pattern_match(&text))
    }
}

fn first_pattern_match(text: &str) -> Option<String> {
    REVENUE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| caps[1].to_string())
}

/// Uppercase, drop spaces, and make sure the figure carries a `$`.
pub(crate) fn normalize_revenue(raw: &str) -> String {
    let cleaned: String = raw.to_uppercase().chars().filter(|c| *c != ' ').collect();
    if cleaned.starts_with('$') {
        cleaned
    } else {
        format!("${cleaned}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn detects_not_found_pages() {
        let page = CompanyPage::parse("<html><body><h1>Page Not Found</h1></body></html>");
        assert!(page.is_not_found());

        let page = CompanyPage::parse("<p>Rank not available for this company</p>");
        assert!(page.is_not_found());

        let page = CompanyPage::parse("<p>Acme Corp</p>");
        assert!(!page.is_not_found());
    }

    #[test]
    fn list_item_with_estimated_revenue() {
        let page = CompanyPage::parse(&load_fixture("growjo-company.html"));
        assert!(!page.is_not_found());
        assert_eq!(page.revenue_figure().as_deref(), Some("$48.2M"));
    }

    #[test]
    fn list_items_win_over_page_text() {
        let html = r#"
            <p>Revenue: $1M reported last decade</p>
            <ul><li>Employees: 120</li><li>Revenue: <b>$7.5M</b></li></ul>
        "#;
        let page = CompanyPage::parse(html);
        assert_eq!(page.revenue_figure().as_deref(), Some("$7.5M"));
    }

    #[test]
    fn falls_back_to_page_text() {
        let html = "<div>Acme has an estimated annual revenue: $12.3m and growing</div>";
        let page = CompanyPage::parse(html);
        assert_eq!(page.revenue_figure().as_deref(), Some("$12.3m"));
    }

    #[test]
    fn trailing_annual_revenue_pattern() {
        let html = "<li>About 30M annual revenue</li>";
        let page = CompanyPage::parse(html);
        assert_eq!(page.revenue_figure().as_deref(), Some("30M"));
    }

    #[test]
    fn no_figure_on_page() {
        let page = CompanyPage::parse("<ul><li>Founded 1999</li></ul>");
        assert_eq!(page.revenue_figure(), None);
    }

    #[test]
    fn normalizes_figures() {
        assert_eq!(normalize_revenue("$12.3m"), "$12.3M");
        assert_eq!(normalize_revenue("30M"), "$30M");
        assert_eq!(normalize_revenue("$ 4 b"), "$4B");
    }
}
