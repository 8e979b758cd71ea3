use std::fs;
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::Path;

use tracing::info;

use crate::error::{Result, ScraperError};
use crate::record::CsvRow;

const SEP: char = ',';

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(mut w: W, row: &[S]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        let cell = cell.as_ref();
        if !first {
            write!(w, "{}", SEP)?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header line followed by one line per record.
pub fn write_records<W: Write, R: CsvRow>(mut w: W, records: &[R]) -> io::Result<()> {
    write_row(&mut w, R::HEADERS)?;
    for record in records {
        write_row(&mut w, record.cells().as_slice())?;
    }
    Ok(())
}

/// Serialize `records` to `path`, creating parent directories as needed.
pub fn write_csv_file<R: CsvRow>(path: &Path, records: &[R]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut w = BufWriter::new(fs::File::create(path)?);
    write_records(&mut w, records)?;
    w.flush()?;
    info!(path = %path.display(), rows = records.len(), "Wrote CSV");
    Ok(())
}

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). Blank lines are skipped.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == SEP && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a final newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// A parsed CSV file: the first row is the header.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn from_text(text: &str) -> Self {
        let mut rows = parse_rows(text.trim_start_matches('\u{feff}'));
        if rows.is_empty() {
            return Self::default();
        }
        let headers = rows.remove(0);
        Self { headers, rows }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ScraperError::MissingFile(path.display().to_string()));
        }
        Ok(Self::from_text(&fs::read_to_string(path)?))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text, or `""` when the row is shorter than the header.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::WorldGrossRecord;
    use tempfile::tempdir;

    fn records_to_string<R: CsvRow>(records: &[R]) -> String {
        let mut buf: Vec<u8> = Vec::new();
        write_records(&mut buf, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn avatar() -> WorldGrossRecord {
        WorldGrossRecord {
            rank: "1".to_string(),
            film_name: "Avatar".to_string(),
            year_released: "2009".to_string(),
            gross_usd: "$2,923,706,026".to_string(),
        }
    }

    #[test]
    fn test_write_quotes_fields_with_commas() {
        let out = records_to_string(&[avatar()]);
        assert_eq!(
            out,
            "Rank,Film Name,Year Released,Gross Collected (USD)\n1,Avatar,2009,\"$2,923,706,026\"\n"
        );
    }

    #[test]
    fn test_write_escapes_quotes() {
        let mut buf = Vec::new();
        write_row(&mut buf, &["say \"hi\"", "plain"]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\"say \"\"hi\"\"\",plain\n");
    }

    #[test]
    fn test_parse_quoted_and_crlf() {
        let rows = parse_rows("a,b\r\n\"x,y\",\"he said \"\"no\"\"\"\r\n\r\nlast,row");
        assert_eq!(
            rows,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["x,y".to_string(), "he said \"no\"".to_string()],
                vec!["last".to_string(), "row".to_string()],
            ]
        );
    }

    #[test]
    fn test_parse_keeps_empty_cells() {
        let rows = parse_rows("a,,c\n");
        assert_eq!(rows, vec![vec!["a".to_string(), String::new(), "c".to_string()]]);
    }

    #[test]
    fn test_file_round_trip_through_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("films.csv");
        write_csv_file(&path, &[avatar()]).unwrap();

        let table = CsvTable::from_path(&path).unwrap();
        assert_eq!(table.len(), 1);
        let gross = table.column_index("Gross Collected (USD)").unwrap();
        assert_eq!(table.cell(0, gross), "$2,923,706,026");
        assert_eq!(table.cell(0, 99), "");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempdir().unwrap();
        let err = CsvTable::from_path(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, ScraperError::MissingFile(_)));
    }
}
