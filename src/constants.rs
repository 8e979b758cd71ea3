/// Source name constants shared by the CLI, config sections and log fields.
pub const WORLD_GROSS_SOURCE: &str = "world_gross";
pub const INDIAN_FILMS_SOURCE: &str = "indian_films";
pub const MOJO_SOURCE: &str = "box_office_mojo";

pub const WORLD_GROSS_URL: &str = "https://en.wikipedia.org/wiki/List_of_highest-grossing_films";
pub const INDIAN_FILMS_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_highest-grossing_Indian_films";
pub const MOJO_URL: &str = "https://www.boxofficemojo.com/chart/ww_top_lifetime_gross/";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const WORLD_GROSS_FILE: &str = "top_50_worldwide_films.csv";
pub const INDIAN_FILMS_FILE: &str = "top_indian_movies.csv";
pub const MOJO_TOP_100_FILE: &str = "mojo_top_100.csv";
pub const MOJO_TOP_500_FILE: &str = "mojo_top_500.csv";
pub const CHART_FILE: &str = "top_grossing_chart.svg";

// CSV column names. Audit and chart key on these literally.
pub const COL_RANK: &str = "Rank";
pub const COL_FILM_NAME: &str = "Film Name";
pub const COL_YEAR_RELEASED: &str = "Year Released";
pub const COL_GROSS_USD: &str = "Gross Collected (USD)";
pub const COL_TITLE: &str = "Title";
pub const COL_YEAR: &str = "Year";
pub const COL_GROSS_RAW: &str = "Gross_Raw";
pub const COL_GROSS_VALUE: &str = "Gross_Value";
pub const COL_LIFETIME_GROSS: &str = "Lifetime Gross (USD)";

/// Rows Box Office Mojo renders per chart page.
pub const MOJO_PAGE_SIZE: usize = 200;

/// Get all supported source names
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![WORLD_GROSS_SOURCE, INDIAN_FILMS_SOURCE, MOJO_SOURCE]
}
