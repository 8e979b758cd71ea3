use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::MojoConfig;
use crate::constants::{MOJO_PAGE_SIZE, MOJO_SOURCE};
use crate::error::Result;
use crate::http::FetchPage;
use crate::normalize::is_nonzero_display_amount;
use crate::record::MojoRecord;
use crate::sources::BoxOfficeSource;
use crate::table::{find_table, TableQuery};

// Fixed column layout of the lifetime chart:
// [0] Rank, [1] Title, [2] Lifetime Gross, [3] Domestic, [4] %, [5] Foreign, [6] %, [7] Year
const COL_RANK: usize = 0;
const COL_TITLE: usize = 1;
const COL_GROSS: usize = 2;
const COL_YEAR: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MojoMode {
    /// One page; any fetch failure aborts the run
    SinglePage,
    /// Consecutive pages; a failed page is logged and skipped
    MultiPage,
}

/// Box Office Mojo worldwide lifetime gross chart.
pub struct MojoSource {
    url: String,
    mode: MojoMode,
    limit: usize,
    page_delay: Duration,
    output_file: String,
}

impl MojoSource {
    pub fn new(config: &MojoConfig, mode: MojoMode) -> Self {
        let (limit, output_file) = match mode {
            MojoMode::SinglePage => (config.single_page_limit, &config.single_page_file),
            MojoMode::MultiPage => (config.multi_page_limit, &config.multi_page_file),
        };
        Self {
            url: config.url.clone(),
            mode,
            limit,
            page_delay: Duration::from_millis(config.page_delay_ms),
            output_file: output_file.clone(),
        }
    }

    /// Row offsets of the pages to request.
    pub fn offsets(&self) -> Vec<usize> {
        match self.mode {
            MojoMode::SinglePage => vec![0],
            MojoMode::MultiPage => {
                let pages = self.limit.div_ceil(MOJO_PAGE_SIZE);
                (0..pages).map(|page| page * MOJO_PAGE_SIZE).collect()
            }
        }
    }

    pub fn page_url(&self, offset: usize) -> String {
        if offset == 0 {
            self.url.clone()
        } else {
            format!("{}?offset={}", self.url, offset)
        }
    }

    /// Read up to `remaining` rows from one chart page.
    pub fn extract_page(html: &str, remaining: usize) -> Result<Vec<MojoRecord>> {
        let table = find_table(
            html,
            &TableQuery {
                table_selector: "table",
                cell_selector: "td",
                required: &[],
            },
        )?;

        let mut records = Vec::new();
        for cells in &table.rows {
            if records.len() >= remaining {
                break;
            }
            if cells.len() < 3 {
                continue;
            }
            match build_record(cells) {
                Some(record) => records.push(record),
                None => debug!(?cells, "Dropped row"),
            }
        }
        Ok(records)
    }
}

fn build_record(cells: &[String]) -> Option<MojoRecord> {
    let title = cells.get(COL_TITLE)?.clone();
    let lifetime_gross = cells.get(COL_GROSS)?.clone();
    if title.is_empty() || !is_nonzero_display_amount(&lifetime_gross) {
        return None;
    }
    Some(MojoRecord {
        rank: cells.get(COL_RANK)?.clone(),
        title,
        lifetime_gross,
        year: cells.get(COL_YEAR)?.clone(),
    })
}

#[async_trait]
impl BoxOfficeSource for MojoSource {
    type Record = MojoRecord;

    fn name(&self) -> &'static str {
        MOJO_SOURCE
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    async fn scrape(&self, fetcher: &dyn FetchPage) -> Result<Vec<MojoRecord>> {
        let offsets = self.offsets();
        let mut records = Vec::new();

        for (page_no, offset) in offsets.iter().enumerate() {
            if records.len() >= self.limit {
                break;
            }
            if page_no > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            info!(rank = offset + 1, "Scraping chart page");
            let remaining = self.limit - records.len();
            let page = match fetcher.fetch_page(&self.page_url(*offset)).await {
                Ok(html) => Self::extract_page(&html, remaining),
                Err(e) => Err(e),
            };

            match page {
                Ok(rows) => records.extend(rows),
                Err(e) if self.mode == MojoMode::MultiPage => {
                    warn!(offset, error = %e, "Skipping chart page");
                }
                Err(e) => return Err(e),
            }
        }

        info!(rows = records.len(), "Scraped Box Office Mojo chart");
        Ok(records)
    }
}
