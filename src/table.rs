//! HTML table discovery.
//!
//! Pages are searched for the first table whose header row satisfies a set
//! of [`ColumnMatcher`]s. Columns are then mapped by header name instead of
//! fixed position. Unlike cell normalization, a table or column that cannot
//! be found is a hard error: it means the page layout changed.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Result, ScraperError};

/// How a header is compared against an alias. Headers are lowercased first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Exact,
    Contains,
}

/// A logical field and the header names it may appear under.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMatcher {
    pub field: &'static str,
    pub aliases: &'static [&'static str],
    pub rule: MatchRule,
}

impl ColumnMatcher {
    pub const fn exact(field: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { field, aliases, rule: MatchRule::Exact }
    }

    pub const fn contains(field: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { field, aliases, rule: MatchRule::Contains }
    }

    pub fn matches(&self, header: &str) -> bool {
        self.aliases.iter().any(|alias| match self.rule {
            MatchRule::Exact => header == *alias,
            MatchRule::Contains => header.contains(alias),
        })
    }

    /// Index of the first header matching any alias.
    pub fn find(&self, headers: &[String]) -> Option<usize> {
        headers.iter().position(|h| self.matches(h))
    }

    pub fn resolve(&self, headers: &[String]) -> Result<usize> {
        self.find(headers).ok_or_else(|| ScraperError::MissingColumn {
            field: self.field.to_string(),
            headers: headers.to_vec(),
        })
    }
}

/// Field name → column index, resolved from a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: Vec<(&'static str, usize)>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String], matchers: &[ColumnMatcher]) -> Result<Self> {
        let indices = matchers
            .iter()
            .map(|m| m.resolve(headers).map(|idx| (m.field, idx)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { indices })
    }

    pub fn index(&self, field: &str) -> Option<usize> {
        self.indices
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, idx)| *idx)
    }

    pub fn max_index(&self) -> usize {
        self.indices.iter().map(|(_, idx)| *idx).max().unwrap_or(0)
    }
}

/// Where to look for a table and how to read its cells.
#[derive(Debug, Clone, Copy)]
pub struct TableQuery<'a> {
    /// CSS selector for candidate tables, e.g. `table.wikitable`
    pub table_selector: &'a str,
    /// CSS selector for cells within a body row, e.g. `td, th`
    pub cell_selector: &'a str,
    /// Every matcher must hit one header for a table to be chosen
    pub required: &'a [ColumnMatcher],
}

/// Header row (lowercased) and body rows of the chosen table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Text of an element: each text fragment trimmed, empty fragments dropped,
/// the rest concatenated.
pub fn cell_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::Config(format!("Invalid CSS selector '{}': {}", css, e)))
}

fn header_row(table: &ElementRef, tr: &Selector, th: &Selector) -> Option<Vec<String>> {
    let first = table.select(tr).next()?;
    Some(
        first
            .select(th)
            .map(|cell| cell_text(&cell).to_lowercase())
            .collect(),
    )
}

/// Find the first table matching `query` and read it.
pub fn find_table(html: &str, query: &TableQuery) -> Result<ScrapedTable> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector(query.table_selector)?;
    let tr_sel = parse_selector("tr")?;
    let th_sel = parse_selector("th")?;
    let cell_sel = parse_selector(query.cell_selector)?;

    let mut scanned = 0;
    for table in document.select(&table_sel) {
        scanned += 1;
        let Some(headers) = header_row(&table, &tr_sel, &th_sel) else {
            continue;
        };
        if !query.required.iter().all(|m| m.find(&headers).is_some()) {
            debug!(?headers, "Skipping table");
            continue;
        }

        let rows = table
            .select(&tr_sel)
            .skip(1)
            .map(|tr| tr.select(&cell_sel).map(|c| cell_text(&c)).collect())
            .collect();
        debug!(scanned, ?headers, "Found matching table");
        return Ok(ScrapedTable { headers, rows });
    }

    let wanted: Vec<&str> = query.required.iter().map(|m| m.field).collect();
    Err(ScraperError::TableNotFound(format!(
        "scanned {} '{}' tables, none had columns {:?}",
        scanned, query.table_selector, wanted
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: ColumnMatcher = ColumnMatcher::exact("title", &["title", "film"]);
    const GROSS: ColumnMatcher = ColumnMatcher::contains("gross", &["gross"]);
    const YEAR: ColumnMatcher = ColumnMatcher::contains("year", &["year"]);

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_matching_header_wins() {
        let h = headers(&["rank", "peak", "film", "worldwide gross", "gross (adj.)", "year"]);
        assert_eq!(TITLE.find(&h), Some(2));
        assert_eq!(GROSS.find(&h), Some(3));
        assert_eq!(YEAR.find(&h), Some(5));
    }

    #[test]
    fn test_exact_rule_does_not_match_substrings() {
        let h = headers(&["film title", "gross"]);
        assert_eq!(TITLE.find(&h), None);
    }

    #[test]
    fn test_missing_column_is_hard_error() {
        let h = headers(&["title", "gross"]);
        let err = ColumnMap::resolve(&h, &[TITLE, GROSS, YEAR]).unwrap_err();
        match err {
            ScraperError::MissingColumn { field, headers } => {
                assert_eq!(field, "year");
                assert_eq!(headers.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_map_indices() {
        let h = headers(&["rank", "title", "worldwide gross", "year"]);
        let map = ColumnMap::resolve(&h, &[TITLE, GROSS, YEAR]).unwrap();
        assert_eq!(map.index("gross"), Some(2));
        assert_eq!(map.index("missing"), None);
        assert_eq!(map.max_index(), 3);
    }

    const PAGE: &str = r#"
        <html><body>
        <table class="wikitable"><tr><th>Rank</th><th>Country</th></tr>
          <tr><td>1</td><td>India</td></tr></table>
        <table class="wikitable">
          <tr><th>Rank</th><th>Title<sup>[a]</sup></th><th>Worldwide gross</th><th>Year</th></tr>
          <tr><td>1</td><th><i><a href="/wiki/A">Avatar</a></i></th><td>  $2,923,706,026 <sup>[1]</sup></td><td>2009</td></tr>
          <tr><td>2</td><td>Short row</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_find_table_skips_non_matching_tables() {
        let query = TableQuery {
            table_selector: "table.wikitable",
            cell_selector: "td, th",
            required: &[ColumnMatcher::exact("title", &["title[a]", "title"])],
        };
        let table = find_table(PAGE, &query).unwrap();
        assert_eq!(table.headers, vec!["rank", "title[a]", "worldwide gross", "year"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["1", "Avatar", "$2,923,706,026[1]", "2009"]);
        assert_eq!(table.rows[1], vec!["2", "Short row"]);
    }

    #[test]
    fn test_find_table_reports_missing_table() {
        let query = TableQuery {
            table_selector: "table.wikitable",
            cell_selector: "td, th",
            required: &[ColumnMatcher::exact("director", &["director"])],
        };
        let err = find_table(PAGE, &query).unwrap_err();
        assert!(matches!(err, ScraperError::TableNotFound(_)));
    }

    #[test]
    fn test_empty_requirements_take_first_table() {
        let query = TableQuery {
            table_selector: "table",
            cell_selector: "td",
            required: &[],
        };
        let table = find_table(PAGE, &query).unwrap();
        assert_eq!(table.rows, vec![vec!["1".to_string(), "India".to_string()]]);
    }
}
