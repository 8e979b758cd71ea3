use crate::constants::*;

/// A row that knows its literal CSV header and how to render its cells.
pub trait CsvRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

/// One film from the worldwide highest-grossing chart.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldGrossRecord {
    pub rank: String,
    pub film_name: String,
    pub year_released: String,
    /// Canonical `$<digits-with-commas>` display string
    pub gross_usd: String,
}

impl CsvRow for WorldGrossRecord {
    const HEADERS: &'static [&'static str] =
        &[COL_RANK, COL_FILM_NAME, COL_YEAR_RELEASED, COL_GROSS_USD];

    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.clone(),
            self.film_name.clone(),
            self.year_released.clone(),
            self.gross_usd.clone(),
        ]
    }
}

/// One film from the highest-grossing Indian films list. `gross_value` is a
/// count of crore, not multiplied out.
#[derive(Debug, Clone, PartialEq)]
pub struct IndianFilmRecord {
    pub title: String,
    pub year: String,
    pub gross_raw: String,
    pub gross_value: f64,
}

impl CsvRow for IndianFilmRecord {
    const HEADERS: &'static [&'static str] = &[COL_TITLE, COL_YEAR, COL_GROSS_RAW, COL_GROSS_VALUE];

    fn cells(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.year.clone(),
            self.gross_raw.clone(),
            format_value(self.gross_value),
        ]
    }
}

/// One row of the Box Office Mojo lifetime chart, kept as scraped.
#[derive(Debug, Clone, PartialEq)]
pub struct MojoRecord {
    pub rank: String,
    pub title: String,
    pub year: String,
    pub lifetime_gross: String,
}

impl CsvRow for MojoRecord {
    const HEADERS: &'static [&'static str] = &[COL_RANK, COL_TITLE, COL_YEAR, COL_LIFETIME_GROSS];

    fn cells(&self) -> Vec<String> {
        vec![
            self.rank.clone(),
            self.title.clone(),
            self.year.clone(),
            self.lifetime_gross.clone(),
        ]
    }
}

/// Whole numbers keep one decimal place (`2200.0`) so the column reads as
/// floating point.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_headers_are_the_audit_contract() {
        assert_eq!(
            WorldGrossRecord::HEADERS,
            &["Rank", "Film Name", "Year Released", "Gross Collected (USD)"]
        );
    }

    #[test]
    fn test_indian_cells_format_value() {
        let record = IndianFilmRecord {
            title: "Dangal".to_string(),
            year: "2016".to_string(),
            gross_raw: "₹1,968–2,200 crore".to_string(),
            gross_value: 2200.0,
        };
        assert_eq!(record.cells()[3], "2200.0");
        assert_eq!(format_value(1968.03), "1968.03");
    }

    #[test]
    fn test_mojo_headers() {
        assert_eq!(
            MojoRecord::HEADERS,
            &["Rank", "Title", "Year", "Lifetime Gross (USD)"]
        );
    }
}
