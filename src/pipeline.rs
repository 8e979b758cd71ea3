use std::path::PathBuf;
use tracing::info;

use crate::csv::write_csv_file;
use crate::error::Result;
use crate::http::FetchPage;
use crate::record::CsvRow;
use crate::sources::BoxOfficeSource;

/// Outcome of one scrape-normalize-write run.
#[derive(Debug, Clone)]
pub struct RunSummary<R> {
    pub source: &'static str,
    pub output_file: PathBuf,
    pub records: Vec<R>,
}

impl<R: CsvRow> RunSummary<R> {
    pub fn rows(&self) -> usize {
        self.records.len()
    }

    /// First `n` rows as header-labelled lines for the console.
    pub fn preview(&self, n: usize) -> Vec<String> {
        self.records
            .iter()
            .take(n)
            .map(|r| {
                R::HEADERS
                    .iter()
                    .zip(r.cells())
                    .map(|(h, c)| format!("{}: {}", h, c))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect()
    }
}

/// Scrape `source` and write its rows to `output_dir`.
#[tracing::instrument(skip_all, fields(source = source.name()))]
pub async fn run_source<S: BoxOfficeSource>(
    source: &S,
    fetcher: &dyn FetchPage,
    output_dir: &str,
) -> Result<RunSummary<S::Record>> {
    info!("Starting scrape");
    let records = source.scrape(fetcher).await?;

    let output_file = PathBuf::from(output_dir).join(source.output_file());
    write_csv_file(&output_file, &records)?;

    Ok(RunSummary {
        source: source.name(),
        output_file,
        records,
    })
}
