//! Time-indexed price table: one [`Record`] per sampling period.

use crate::config::EngineConfig;
use crate::error::DatasetError;

/// One frame: the two date fields plus a price per entity, in column order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub month: String,
    pub year: String,
    prices: Vec<(String, f64)>,
}

impl Record {
    pub fn new(month: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            year: year.into(),
            prices: Vec::new(),
        }
    }

    pub fn with_price(mut self, id: impl Into<String>, price: f64) -> Self {
        self.prices.push((id.into(), price));
        self
    }

    pub fn price(&self, id: &str) -> Option<f64> {
        self.prices
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, p)| *p)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.prices.iter().map(|(k, p)| (k.as_str(), *p))
    }

    pub fn entity_count(&self) -> usize {
        self.prices.len()
    }
}

/// Reads the longest leading decimal number, ignoring any trailing text.
/// Anything without one (including `inf`/`nan` words) becomes NaN and is
/// carried through the mappers as-is.
pub fn parse_price(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        end += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = count_digits(&bytes[exp..]);
        if n > 0 {
            end = exp + n;
        }
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Parses a comma-separated table whose header names the date fields and
    /// one column per entity.
    pub fn from_csv(text: &str, config: &EngineConfig) -> Result<Self, DatasetError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty());
        let (_, header) = lines.next().ok_or(DatasetError::Empty)?;
        let header: Vec<String> = split_row(header).map(str::to_string).collect();
        if let Some(dup) = header
            .iter()
            .enumerate()
            .find(|(i, h)| header[..*i].contains(h))
            .map(|(_, h)| h.clone())
        {
            return Err(DatasetError::DuplicateField(dup));
        }

        let month_col = header
            .iter()
            .position(|h| *h == config.month_field)
            .ok_or(DatasetError::MissingField("month"))?;
        let year_col = header
            .iter()
            .position(|h| *h == config.year_field)
            .ok_or(DatasetError::MissingField("year"))?;

        let mut records = Vec::new();
        for (idx, line) in lines {
            let fields: Vec<&str> = split_row(line).collect();
            if fields.len() != header.len() {
                return Err(DatasetError::Ragged {
                    line: idx + 1,
                    expected: header.len(),
                    found: fields.len(),
                });
            }
            let mut record = Record::new(fields[month_col], fields[year_col]);
            for (col, name) in header.iter().enumerate() {
                if col == month_col || col == year_col {
                    continue;
                }
                record.prices.push((name.clone(), parse_price(fields[col])));
            }
            records.push(record);
        }
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        log::info!(
            "[data] loaded {} frames x {} entities",
            records.len(),
            records[0].entity_count()
        );
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    pub fn entity_ids(&self) -> Vec<&str> {
        self.first()
            .map(|r| r.entities().map(|(id, _)| id).collect())
            .unwrap_or_default()
    }
}

fn split_row(line: &str) -> impl Iterator<Item = &str> {
    line.trim_end_matches('\r')
        .split(',')
        .map(|f| f.trim().trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Month,Year,US,CA,TX\n1,2000,2.00,2.10,1.90\n2,2000,2.50,n/a,1.95\n";

    #[test]
    fn parses_header_and_rows() {
        let ds = Dataset::from_csv(CSV, &EngineConfig::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.entity_ids(), vec!["US", "CA", "TX"]);
        let first = ds.first().unwrap();
        assert_eq!(first.month, "1");
        assert_eq!(first.year, "2000");
        assert_eq!(first.price("CA"), Some(2.10));
        assert_eq!(first.price("Month"), None);
    }

    #[test]
    fn bad_price_becomes_nan() {
        let ds = Dataset::from_csv(CSV, &EngineConfig::default()).unwrap();
        assert!(ds.get(1).unwrap().price("CA").unwrap().is_nan());
    }

    #[test]
    fn price_reads_leading_number_only() {
        assert_eq!(parse_price(" 2.5abc"), 2.5);
        assert_eq!(parse_price("1.259"), 1.259);
        assert_eq!(parse_price("-.5"), -0.5);
        assert_eq!(parse_price("3."), 3.0);
        assert_eq!(parse_price("1e2x"), 100.0);
        assert_eq!(parse_price("2e"), 2.0);
        for word in ["inf", "infinity", "NaN", "n/a", ".", "-", ""] {
            assert!(parse_price(word).is_nan(), "{word}");
        }
    }

    #[test]
    fn repeated_header_column_is_rejected() {
        let err = Dataset::from_csv("Month,Year,US,US\n1,2000,1.0,2.0\n", &EngineConfig::default());
        assert_eq!(err, Err(DatasetError::DuplicateField("US".into())));
    }

    #[test]
    fn date_columns_may_appear_anywhere() {
        let csv = "\"US\",\"Year\",\"Month\"\r\n3.1,1999,12\r\n\r\n";
        let ds = Dataset::from_csv(csv, &EngineConfig::default()).unwrap();
        let r = ds.first().unwrap();
        assert_eq!((r.month.as_str(), r.year.as_str()), ("12", "1999"));
        assert_eq!(r.price("US"), Some(3.1));
    }

    #[test]
    fn rejects_missing_date_column() {
        let err = Dataset::from_csv("Year,US\n2000,1.0\n", &EngineConfig::default());
        assert_eq!(err, Err(DatasetError::MissingField("month")));
    }

    #[test]
    fn rejects_ragged_rows_with_line_number() {
        let err = Dataset::from_csv("Month,Year,US\n1,2000\n", &EngineConfig::default());
        assert_eq!(
            err,
            Err(DatasetError::Ragged {
                line: 2,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn header_only_is_empty() {
        assert_eq!(
            Dataset::from_csv("Month,Year,US\n", &EngineConfig::default()),
            Err(DatasetError::Empty)
        );
        assert_eq!(
            Dataset::from_csv("", &EngineConfig::default()),
            Err(DatasetError::Empty)
        );
    }
}
