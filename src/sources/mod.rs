pub mod box_office_mojo;
pub mod indian_films;
pub mod world_gross;

pub use box_office_mojo::{MojoMode, MojoSource};
pub use indian_films::IndianFilmsSource;
pub use world_gross::WorldGrossSource;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::FetchPage;
use crate::record::CsvRow;

/// Core trait that every box-office table source implements
#[async_trait]
pub trait BoxOfficeSource: Send + Sync {
    type Record: CsvRow + Send;

    /// Unique identifier for this source
    fn name(&self) -> &'static str;

    /// File name the scraped rows are written to
    fn output_file(&self) -> &str;

    /// Fetch the page(s) and turn them into records
    async fn scrape(&self, fetcher: &dyn FetchPage) -> Result<Vec<Self::Record>>;
}
