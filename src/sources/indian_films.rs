use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::IndianFilmsConfig;
use crate::constants::INDIAN_FILMS_SOURCE;
use crate::error::Result;
use crate::http::FetchPage;
use crate::normalize::{clean_text, parse_currency};
use crate::record::IndianFilmRecord;
use crate::sources::BoxOfficeSource;
use crate::table::{find_table, ColumnMap, ColumnMatcher, TableQuery};

const TITLE_ALIASES: &[&str] = &["title", "film"];

const IDENTIFY: &[ColumnMatcher] = &[
    ColumnMatcher::exact("title", TITLE_ALIASES),
    ColumnMatcher::exact("gross", &["worldwide gross", "gross"]),
];

const COLUMNS: &[ColumnMatcher] = &[
    ColumnMatcher::exact("title", TITLE_ALIASES),
    ColumnMatcher::contains("gross", &["gross"]),
    ColumnMatcher::contains("year", &["year"]),
];

/// Wikipedia "List of highest-grossing Indian films". Grosses are quoted in
/// crore and frequently as ranges.
pub struct IndianFilmsSource {
    url: String,
    limit: usize,
    output_file: String,
}

impl IndianFilmsSource {
    pub fn new(config: &IndianFilmsConfig) -> Self {
        Self {
            url: config.url.clone(),
            limit: config.limit,
            output_file: config.output_file.clone(),
        }
    }

    /// Rows are ranked by parsed gross, highest first, and cut to the limit.
    pub fn extract(&self, html: &str) -> Result<Vec<IndianFilmRecord>> {
        let table = find_table(
            html,
            &TableQuery {
                table_selector: "table.wikitable",
                cell_selector: "td, th",
                required: IDENTIFY,
            },
        )?;
        let columns = ColumnMap::resolve(&table.headers, COLUMNS)?;

        let mut records: Vec<IndianFilmRecord> = table
            .rows
            .iter()
            .filter(|cells| cells.len() > columns.max_index())
            .filter_map(|cells| build_record(cells, &columns))
            .collect();

        records.sort_by(|a, b| b.gross_value.total_cmp(&a.gross_value));
        records.truncate(self.limit);

        info!(rows = records.len(), "Extracted Indian films chart");
        Ok(records)
    }
}

fn build_record(cells: &[String], columns: &ColumnMap) -> Option<IndianFilmRecord> {
    let cell = |field: &str| columns.index(field).and_then(|idx| cells.get(idx));

    let title = clean_text(cell("title")?);
    let year = clean_text(cell("year")?);
    let gross_raw = cell("gross")?.clone();

    // A repeated header row or a cell without a figure parses to nothing
    let amount = parse_currency(&gross_raw);
    if !amount.is_usable() || title.is_empty() {
        debug!(%title, %gross_raw, ?amount, "Dropped row");
        return None;
    }

    Some(IndianFilmRecord {
        title,
        year,
        gross_raw,
        gross_value: amount.value(),
    })
}

#[async_trait]
impl BoxOfficeSource for IndianFilmsSource {
    type Record = IndianFilmRecord;

    fn name(&self) -> &'static str {
        INDIAN_FILMS_SOURCE
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    async fn scrape(&self, fetcher: &dyn FetchPage) -> Result<Vec<IndianFilmRecord>> {
        let html = fetcher.fetch_page(&self.url).await?;
        self.extract(&html)
    }
}
