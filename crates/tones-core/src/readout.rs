//! Text readouts shown beside the map: month name, year and headline price.

use crate::dataset::Record;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month name for a 1-based month number.
pub fn month_name(month: &str) -> Option<&'static str> {
    let n: usize = month.trim().parse().ok()?;
    MONTH_NAMES.get(n.checked_sub(1)?).copied()
}

/// `$` followed by three decimals; NaN prints as `$NaN`.
pub fn format_price(price: f64) -> String {
    if price.is_nan() {
        "$NaN".to_string()
    } else {
        format!("${:.3}", price)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Readout {
    pub month: String,
    pub year: String,
    pub price: Option<String>,
}

impl Readout {
    pub fn from_record(record: &Record, headline_entity: &str) -> Self {
        Self {
            month: month_name(&record.month)
                .map(str::to_string)
                .unwrap_or_else(|| record.month.clone()),
            year: record.year.clone(),
            price: record.price(headline_entity).map(format_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name("1"), Some("January"));
        assert_eq!(month_name(" 12 "), Some("December"));
        assert_eq!(month_name("0"), None);
        assert_eq!(month_name("13"), None);
        assert_eq!(month_name("Jan"), None);
    }

    #[test]
    fn readout_formats_headline_price() {
        let r = Record::new("3", "2004").with_price("US", 1.7).with_price("CA", 2.0);
        let out = Readout::from_record(&r, "US");
        assert_eq!(out.month, "March");
        assert_eq!(out.year, "2004");
        assert_eq!(out.price.as_deref(), Some("$1.700"));
    }

    #[test]
    fn readout_keeps_raw_month_when_unparseable() {
        let r = Record::new("?", "2004").with_price("US", f64::NAN);
        let out = Readout::from_record(&r, "US");
        assert_eq!(out.month, "?");
        assert_eq!(out.price.as_deref(), Some("$NaN"));
        assert_eq!(Readout::from_record(&r, "ZZ").price, None);
    }
}
