//! Price parsing and day-level aggregation.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::types::PriceObservation;

/// How a marketplace writes its prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceFormat {
    /// `R$1.234,56`: dot groups thousands, comma marks decimals.
    #[default]
    Brazilian,
    /// `$1,234.56`: comma groups thousands, dot marks decimals.
    Plain,
}

fn number_token() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d[\d.,]*").ok()).as_ref()
}

/// Extract the first number from a currency string.
///
/// Returns `None` when no finite number can be read.
pub fn parse_price(text: &str, format: PriceFormat) -> Option<f64> {
    let token = number_token()?.find(text)?.as_str();
    let token = token.trim_end_matches(['.', ',']);
    let canonical = match format {
        PriceFormat::Brazilian => token.replace('.', "").replace(',', "."),
        PriceFormat::Plain => token.replace(',', ""),
    };
    canonical.parse::<f64>().ok().filter(|p| p.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Statistics over the finite values in `prices`; `None` if there are none.
pub fn summarize(prices: &[f64]) -> Option<PriceStats> {
    let mut values: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 1 {
        values[count / 2]
    } else {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    };
    Some(PriceStats { count, mean, median, min: values[0], max: values[count - 1] })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub stats: PriceStats,
}

/// Group `(day, price)` points by calendar day, oldest first. Non-finite
/// prices are dropped; an empty result means there is no data to chart.
pub fn daily_summary<I>(points: I) -> Vec<DaySummary>
where
    I: IntoIterator<Item = (NaiveDate, f64)>,
{
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for (day, price) in points {
        if price.is_finite() {
            by_day.entry(day).or_default().push(price);
        }
    }
    by_day
        .into_iter()
        .filter_map(|(day, prices)| summarize(&prices).map(|stats| DaySummary { day, stats }))
        .collect()
}

pub fn daily_summary_of(observations: &[PriceObservation]) -> Vec<DaySummary> {
    daily_summary(observations.iter().map(|o| (o.day, o.price)))
}

/// The per-day mean series fed to the forecaster.
pub fn daily_means(days: &[DaySummary]) -> Vec<f64> {
    days.iter().map(|d| d.stats.mean).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn brazilian_prices() {
        assert_eq!(parse_price("R$1.234,56", PriceFormat::Brazilian), Some(1234.56));
        assert_eq!(parse_price("R$ 25", PriceFormat::Brazilian), Some(25.0));
        assert_eq!(parse_price("R$ 0,99", PriceFormat::Brazilian), Some(0.99));
        assert_eq!(parse_price("1.000.000", PriceFormat::Brazilian), Some(1_000_000.0));
    }

    #[test]
    fn plain_prices() {
        assert_eq!(parse_price("$1,234.56", PriceFormat::Plain), Some(1234.56));
        assert_eq!(parse_price("USD 7.", PriceFormat::Plain), Some(7.0));
    }

    #[test]
    fn unparseable_prices() {
        assert_eq!(parse_price("Consulte", PriceFormat::Brazilian), None);
        assert_eq!(parse_price("", PriceFormat::Plain), None);
    }

    #[test]
    fn day_aggregation() {
        let days = daily_summary(vec![(day(1), 10.0), (day(1), 20.0), (day(2), 30.0)]);
        assert_eq!(days.len(), 2);
        let d1 = days[0].stats;
        assert_eq!((d1.mean, d1.median, d1.min, d1.max, d1.count), (15.0, 15.0, 10.0, 20.0, 2));
        let d2 = days[1].stats;
        assert_eq!((d2.mean, d2.median, d2.min, d2.max, d2.count), (30.0, 30.0, 30.0, 30.0, 1));
    }

    #[test]
    fn days_come_out_sorted_and_nan_is_dropped() {
        let days = daily_summary(vec![(day(5), 1.0), (day(2), f64::NAN), (day(3), 2.0)]);
        let order: Vec<_> = days.iter().map(|d| d.day).collect();
        assert_eq!(order, vec![day(3), day(5)]);
    }

    #[test]
    fn empty_input_means_no_data() {
        assert!(daily_summary(Vec::new()).is_empty());
        assert!(summarize(&[f64::INFINITY]).is_none());
    }

    #[test]
    fn odd_median() {
        let stats = summarize(&[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
    }
}
