use crate::data::price::PricePoint;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "date")]
    timestamp: String,
    #[serde(alias = "close")]
    price: f64,
    #[serde(default)]
    symbol: Option<String>,
}

//parses rfc3339 timestamps or plain yyyy-mm-dd dates (as midnight utc)
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .context(format!("Unrecognized timestamp '{}'", raw))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .context(format!("Invalid date '{}'", raw))?;

    Ok(midnight.and_utc())
}

//loads a price series from a csv file
//rows with a symbol column that does not match `symbol` are skipped
fn load_filtered(path: &Path, symbol: Option<&str>) -> Result<Vec<PricePoint>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut points = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let line = index + 2;
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", line))?;

        if let (Some(wanted), Some(found)) = (symbol, record.symbol.as_deref()) {
            if !found.eq_ignore_ascii_case(wanted) {
                continue;
            }
        }

        let timestamp = parse_timestamp(&record.timestamp)
            .context(format!("Failed to parse timestamp at line {}", line))?;

        let point = PricePoint::new(timestamp, record.price)
            .context(format!("Invalid price at line {}", line))?;

        points.push(point);
    }

    //sort by timestamp to ensure chronological order
    points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(points)
}

//loads every row of a price csv
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PricePoint>> {
    load_filtered(path.as_ref(), None)
}

//loads only the rows for one symbol (rows without a symbol column are kept)
pub fn load_csv_for_symbol<P: AsRef<Path>>(path: P, symbol: &str) -> Result<Vec<PricePoint>> {
    load_filtered(path.as_ref(), Some(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_sorts_rows() {
        let file = write_csv(
            "timestamp,price\n\
             2024-01-03,12.5\n\
             2024-01-02T00:00:00Z,11.0\n",
        );

        let points = load_csv(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].price, 11.0);
        assert_eq!(
            points[1].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn accepts_close_and_date_headers() {
        let file = write_csv("date,close\n2024-02-01,100\n2024-02-02,101\n");
        let points = load_csv(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].price, 101.0);
    }

    #[test]
    fn filters_by_symbol() {
        let file = write_csv(
            "timestamp,price,symbol\n\
             2024-01-02,10,AAPL\n\
             2024-01-02,300,MSFT\n\
             2024-01-03,11,aapl\n",
        );

        let points = load_csv_for_symbol(file.path(), "AAPL").unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.iter().all(|p| p.price < 100.0));
    }

    #[test]
    fn rejects_bad_timestamp_and_price() {
        let bad_ts = write_csv("timestamp,price\nyesterday,10\n");
        assert!(load_csv(bad_ts.path()).is_err());

        let bad_price = write_csv("timestamp,price\n2024-01-02,-1\n");
        assert!(load_csv(bad_price.path()).is_err());
    }
}
