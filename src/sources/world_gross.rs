use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::WorldGrossConfig;
use crate::constants::WORLD_GROSS_SOURCE;
use crate::error::Result;
use crate::http::FetchPage;
use crate::normalize::{canonical_usd, clean_text, is_nonzero_display_amount};
use crate::record::WorldGrossRecord;
use crate::sources::BoxOfficeSource;
use crate::table::{find_table, ColumnMap, ColumnMatcher, TableQuery};

/// Headers that identify the main chart on the Wikipedia page.
const IDENTIFY: &[ColumnMatcher] = &[
    ColumnMatcher::exact("worldwide gross", &["worldwide gross"]),
    ColumnMatcher::exact("title", &["title"]),
];

const COLUMNS: &[ColumnMatcher] = &[
    ColumnMatcher::contains("title", &["title"]),
    ColumnMatcher::contains("gross", &["gross"]),
    ColumnMatcher::contains("year", &["year"]),
];

/// Wikipedia "List of highest-grossing films" main chart.
pub struct WorldGrossSource {
    url: String,
    limit: usize,
    output_file: String,
}

impl WorldGrossSource {
    pub fn new(config: &WorldGrossConfig) -> Self {
        Self {
            url: config.url.clone(),
            limit: config.limit,
            output_file: config.output_file.clone(),
        }
    }

    pub fn extract(&self, html: &str) -> Result<Vec<WorldGrossRecord>> {
        let table = find_table(
            html,
            &TableQuery {
                table_selector: "table.wikitable",
                cell_selector: "td, th",
                required: IDENTIFY,
            },
        )?;
        let columns = ColumnMap::resolve(&table.headers, COLUMNS)?;

        let mut records = Vec::new();
        for (row_no, cells) in table.rows.iter().enumerate() {
            if records.len() >= self.limit {
                break;
            }
            if cells.len() < 3 {
                continue;
            }
            match build_record(cells, &columns) {
                Some(record) => records.push(record),
                None => debug!(row_no, ?cells, "Dropped row"),
            }
        }

        info!(rows = records.len(), "Extracted worldwide gross chart");
        Ok(records)
    }
}

/// Assemble one row. Rows missing a mapped cell, with an empty title, or
/// whose gross is not a non-zero amount are dropped.
fn build_record(cells: &[String], columns: &ColumnMap) -> Option<WorldGrossRecord> {
    let cell = |field: &str| columns.index(field).and_then(|idx| cells.get(idx));

    let title = clean_text(cell("title")?);
    let gross = canonical_usd(cell("gross")?);
    let year = clean_text(cell("year")?);
    let rank = clean_text(cells.first()?);

    if title.is_empty() || !is_nonzero_display_amount(&gross) {
        return None;
    }

    Some(WorldGrossRecord {
        rank,
        film_name: title,
        year_released: year,
        gross_usd: gross,
    })
}

#[async_trait]
impl BoxOfficeSource for WorldGrossSource {
    type Record = WorldGrossRecord;

    fn name(&self) -> &'static str {
        WORLD_GROSS_SOURCE
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    async fn scrape(&self, fetcher: &dyn FetchPage) -> Result<Vec<WorldGrossRecord>> {
        let html = fetcher.fetch_page(&self.url).await?;
        self.extract(&html)
    }
}
