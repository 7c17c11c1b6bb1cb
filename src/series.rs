use crate::error::ProviderError;

use chrono::Months;

/// Trailing look-back windows accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl Period {
    pub const LABELS: [&'static str; 7] = ["1M", "3M", "6M", "1Y", "2Y", "5Y", "MAX"];

    fn months(self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::TwoYears => Some(24),
            Period::FiveYears => Some(60),
            Period::Max => None,
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(Period::OneMonth),
            "3M" => Ok(Period::ThreeMonths),
            "6M" => Ok(Period::SixMonths),
            "1Y" => Ok(Period::OneYear),
            "2Y" => Ok(Period::TwoYears),
            "5Y" => Ok(Period::FiveYears),
            "MAX" => Ok(Period::Max),
            other => Err(format!(
                "Invalid period {:?}. Available: {}",
                other,
                Period::LABELS.join(", ")
            )),
        }
    }
}

/// Which slice of a loaded series to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    /// Inclusive on both ends; either bound may be open.
    Range {
        start: Option<chrono::NaiveDate>,
        end: Option<chrono::NaiveDate>,
    },
    Trailing(Period),
}

/// Closing prices with a parallel list of trading dates, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub ticker: String,
    pub dates: Vec<chrono::NaiveDate>,
    pub prices: Vec<f64>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn first_date(&self) -> Option<chrono::NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<chrono::NaiveDate> {
        self.dates.last().copied()
    }

    /// Narrows the series to `selection`.
    ///
    /// # Errors
    /// * `InvalidRange` if an explicit start is after the end.
    /// * `NoData` if nothing remains.
    pub fn select(self, selection: Selection) -> Result<PriceSeries, ProviderError> {
        let (start, end) = match selection {
            Selection::All => (None, None),
            Selection::Range { start, end } => {
                if let (Some(s), Some(e)) = (start, end) {
                    if s > e {
                        return Err(ProviderError::InvalidRange { start: s, end: e });
                    }
                }
                (start, end)
            }
            Selection::Trailing(period) => {
                let start = match (period.months(), self.last_date()) {
                    (Some(months), Some(last)) => last.checked_sub_months(Months::new(months)),
                    _ => None,
                };
                (start, None)
            }
        };

        let keep = |date: &chrono::NaiveDate| {
            start.is_none_or(|s| *date >= s) && end.is_none_or(|e| *date <= e)
        };
        let (dates, prices): (Vec<_>, Vec<_>) = self
            .dates
            .into_iter()
            .zip(self.prices)
            .filter(|(date, _)| keep(date))
            .unzip();

        if prices.is_empty() {
            return Err(ProviderError::NoData(self.ticker));
        }

        Ok(PriceSeries { ticker: self.ticker, dates, prices })
    }

    /// Cuts the series after the last trading day on or before `requested`.
    ///
    /// When `requested` is not a trading day the nearest previous one is
    /// used; the returned `AsOf` records both.
    ///
    /// # Errors
    /// * `NoData` if every day is after `requested`.
    pub fn truncate_as_of(self, requested: chrono::NaiveDate) -> Result<(PriceSeries, AsOf), ProviderError> {
        // dates are sorted, so everything up to the partition point qualifies
        let keep = self.dates.partition_point(|d| *d <= requested);
        if keep == 0 {
            return Err(ProviderError::NoData(format!("{} on or before {}", self.ticker, requested)));
        }

        let mut dates = self.dates;
        let mut prices = self.prices;
        dates.truncate(keep);
        prices.truncate(keep);
        let as_of = AsOf { requested, resolved: dates[keep - 1] };

        Ok((PriceSeries { ticker: self.ticker, dates, prices }, as_of))
    }
}

/// The day a point-in-time report is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsOf {
    pub requested: chrono::NaiveDate,
    /// Last trading day on or before `requested`.
    pub resolved: chrono::NaiveDate,
}

impl AsOf {
    pub fn fell_back(&self) -> bool {
        self.requested != self.resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn series() -> PriceSeries {
        PriceSeries {
            ticker: "TEST".into(),
            dates: ["2024-01-15", "2024-02-15", "2024-03-15", "2024-04-15"]
                .iter()
                .map(|d| date(d))
                .collect(),
            prices: vec![1.0, 2.0, 3.0, 4.0],
        }
    }

    #[test]
    fn test_range_is_inclusive() {
        let selected = series()
            .select(Selection::Range {
                start: Some(date("2024-02-15")),
                end: Some(date("2024-03-15")),
            })
            .unwrap();
        assert_eq!(selected.prices, vec![2.0, 3.0]);
    }

    #[test]
    fn test_open_ended_range() {
        let selected = series()
            .select(Selection::Range { start: Some(date("2024-03-01")), end: None })
            .unwrap();
        assert_eq!(selected.prices, vec![3.0, 4.0]);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let err = series()
            .select(Selection::Range {
                start: Some(date("2024-04-01")),
                end: Some(date("2024-01-01")),
            })
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRange { .. }));
    }

    #[test]
    fn test_empty_selection_is_no_data() {
        let err = series()
            .select(Selection::Range { start: Some(date("2025-01-01")), end: None })
            .unwrap_err();
        assert!(matches!(err, ProviderError::NoData(ref t) if t == "TEST"));
    }

    #[test]
    fn test_trailing_period_counts_back_from_last_date() {
        let selected = series().select(Selection::Trailing(Period::OneMonth)).unwrap();
        assert_eq!(selected.dates, vec![date("2024-03-15"), date("2024-04-15")]);

        let selected = series().select(Selection::Trailing(Period::Max)).unwrap();
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn test_as_of_exact_trading_day() {
        let (cut, as_of) = series().truncate_as_of(date("2024-02-15")).unwrap();
        assert_eq!(cut.prices, vec![1.0, 2.0]);
        assert_eq!(as_of.resolved, date("2024-02-15"));
        assert!(!as_of.fell_back());
    }

    #[test]
    fn test_as_of_falls_back_to_previous_trading_day() {
        let (cut, as_of) = series().truncate_as_of(date("2024-03-20")).unwrap();
        assert_eq!(cut.prices, vec![1.0, 2.0, 3.0]);
        assert_eq!(as_of, AsOf { requested: date("2024-03-20"), resolved: date("2024-03-15") });
        assert!(as_of.fell_back());
    }

    #[test]
    fn test_as_of_before_first_day_is_no_data() {
        let err = series().truncate_as_of(date("2024-01-01")).unwrap_err();
        assert!(matches!(err, ProviderError::NoData(_)));
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("6m".parse::<Period>(), Ok(Period::SixMonths));
        assert_eq!("MAX".parse::<Period>(), Ok(Period::Max));
        assert!("7D".parse::<Period>().is_err());
    }
}
