//! Deterministic offline data provider
//!
//! Generates plausible-looking market data from a per-symbol seed so the
//! terminal runs end to end with no network access or API keys. The same
//! symbol and window always produce the same series, which also makes this
//! provider convenient in scenario tests.

use crate::provider::{
    Candle, Indicator, MarketDataProvider, ProviderError, Result, Screen, Statement,
};
use async_trait::async_trait;
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use terminal_core::Interval;

/// Coins the sample provider pretends to list
const KNOWN_COINS: &[&str] = &["bitcoin", "ethereum", "solana", "dogecoin", "cardano"];

/// Offline provider backed by a seeded pseudo-random walk
#[derive(Debug, Clone, Default)]
pub struct SampleDataProvider;

impl SampleDataProvider {
    pub fn new() -> Self {
        Self
    }

    fn seed_for(symbol: &str) -> u64 {
        symbol
            .bytes()
            .fold(0xcbf2_9ce4_8422_2325_u64, |acc, b| {
                (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            })
    }

    /// Next step of a 64-bit LCG, mapped to `[0, 1)`
    fn next_unit(state: &mut u64) -> f64 {
        *state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((*state >> 33) % 1_000_000) as f64 / 1_000_000.0
    }

    fn closes(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, f64)> {
        let mut state = Self::seed_for(symbol);
        let mut price = 20.0 + (state % 180) as f64;
        let mut out = Vec::new();
        let mut date = start;
        while date <= end {
            // Weekdays only, like an exchange calendar
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let step = (Self::next_unit(&mut state) - 0.5) * 0.04;
                price = (price * (1.0 + step)).max(0.5);
                out.push((date, price));
            }
            date += Duration::days(1);
        }
        out
    }
}

#[async_trait]
impl MarketDataProvider for SampleDataProvider {
    async fn validate_symbol(&self, symbol: &str) -> Result<()> {
        let ok = !symbol.is_empty()
            && symbol.len() <= 6
            && symbol.chars().all(|c| c.is_ascii_alphabetic());
        if ok {
            Ok(())
        } else {
            Err(ProviderError::UnknownSymbol(symbol.to_string()))
        }
    }

    async fn ohlc(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        _interval: Interval,
    ) -> Result<Vec<Candle>> {
        self.validate_symbol(symbol).await?;
        let closes = Self::closes(symbol, start, end);
        if closes.is_empty() {
            return Err(ProviderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "window contains no trading days".to_string(),
            });
        }

        let mut state = Self::seed_for(symbol).rotate_left(17);
        let candles = closes
            .iter()
            .map(|&(date, close)| {
                let spread = close * 0.01 * Self::next_unit(&mut state);
                let open = close - spread / 2.0;
                Candle {
                    date,
                    open,
                    high: close + spread,
                    low: (open - spread).max(0.1),
                    close,
                    volume: 100_000 + (state % 900_000),
                }
            })
            .collect();
        Ok(candles)
    }

    async fn indicator_series(
        &self,
        symbol: &str,
        indicator: Indicator,
        length: usize,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        self.validate_symbol(symbol).await?;
        if length == 0 {
            return Err(ProviderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "indicator length must be positive".to_string(),
            });
        }
        let closes = Self::closes(symbol, start, end);
        if closes.len() < length + 1 {
            return Err(ProviderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!(
                    "need at least {} trading days for a length-{length} {}",
                    length + 1,
                    indicator.label()
                ),
            });
        }

        let series = match indicator {
            Indicator::Sma => closes
                .windows(length)
                .map(|w| {
                    let mean = w.iter().map(|(_, c)| c).sum::<f64>() / length as f64;
                    (w[length - 1].0, mean)
                })
                .collect(),
            Indicator::Ema => {
                let alpha = 2.0 / (length as f64 + 1.0);
                let mut ema = closes[0].1;
                closes
                    .iter()
                    .map(|&(date, close)| {
                        ema = alpha * close + (1.0 - alpha) * ema;
                        (date, ema)
                    })
                    .skip(length - 1)
                    .collect()
            }
            Indicator::Rsi => closes
                .windows(length + 1)
                .map(|w| {
                    let (mut gains, mut losses) = (0.0_f64, 0.0_f64);
                    for pair in w.windows(2) {
                        let delta = pair[1].1 - pair[0].1;
                        if delta >= 0.0 {
                            gains += delta;
                        } else {
                            losses -= delta;
                        }
                    }
                    let rsi = if losses == 0.0 {
                        100.0
                    } else {
                        100.0 - 100.0 / (1.0 + gains / losses)
                    };
                    (w[length].0, rsi)
                })
                .collect(),
        };
        Ok(series)
    }

    async fn fundamentals(
        &self,
        symbol: &str,
        statement: Statement,
    ) -> Result<Vec<(String, String)>> {
        self.validate_symbol(symbol).await?;
        let seed = Self::seed_for(symbol);
        let base = (seed % 9_000 + 1_000) as f64;

        let rows: Vec<(&str, String)> = match statement {
            Statement::Overview => vec![
                ("Sector", "Consumer Cyclical".to_string()),
                ("Market cap", format!("{:.1}M", base * 1.7)),
                ("P/E", format!("{:.2}", 8.0 + (seed % 40) as f64)),
                ("Beta", format!("{:.2}", 0.5 + (seed % 200) as f64 / 100.0)),
            ],
            Statement::Income => vec![
                ("Revenue", format!("{:.1}M", base * 4.0)),
                ("Gross profit", format!("{:.1}M", base * 1.4)),
                ("Operating income", format!("{:.1}M", base * 0.6)),
                ("Net income", format!("{:.1}M", base * 0.4)),
            ],
            Statement::Balance => vec![
                ("Total assets", format!("{:.1}M", base * 9.0)),
                ("Total liabilities", format!("{:.1}M", base * 5.2)),
                ("Shareholder equity", format!("{:.1}M", base * 3.8)),
                ("Cash", format!("{:.1}M", base * 1.1)),
            ],
            Statement::CashFlow => vec![
                ("Operating cash flow", format!("{:.1}M", base * 0.9)),
                ("Investing cash flow", format!("{:.1}M", -base * 0.3)),
                ("Financing cash flow", format!("{:.1}M", -base * 0.2)),
                ("Free cash flow", format!("{:.1}M", base * 0.5)),
            ],
        };
        Ok(rows
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect())
    }

    async fn similar_companies(&self, symbol: &str) -> Result<Vec<String>> {
        self.validate_symbol(symbol).await?;
        let similar = match symbol {
            "GME" => vec!["AMC", "BB", "KOSS", "EXPR"],
            "AAPL" => vec!["MSFT", "GOOG", "AMZN", "META"],
            "TSLA" => vec!["F", "GM", "NIO", "RIVN"],
            _ => vec!["SPY", "QQQ", "IWM"],
        };
        Ok(similar.into_iter().map(String::from).collect())
    }

    async fn correlation_matrix(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Vec<f64>>> {
        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            self.validate_symbol(symbol).await?;
            let closes: Vec<f64> = Self::closes(symbol, start, end)
                .into_iter()
                .map(|(_, c)| c)
                .collect();
            if closes.len() < 2 {
                return Err(ProviderError::DataUnavailable {
                    symbol: symbol.clone(),
                    reason: "window too short for correlation".to_string(),
                });
            }
            series.push(closes);
        }

        let matrix = series
            .iter()
            .map(|a| series.iter().map(|b| pearson(a, b)).collect())
            .collect();
        Ok(matrix)
    }

    async fn sentiment_series(&self, symbol: &str, days: u32) -> Result<Vec<(NaiveDate, f64)>> {
        self.validate_symbol(symbol).await?;
        if days == 0 {
            return Err(ProviderError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "sentiment window must cover at least one day".to_string(),
            });
        }
        let end = Local::now().date_naive();
        let start = end - Duration::days(i64::from(days) - 1);

        let mut state = Self::seed_for(symbol).rotate_left(29);
        let mut score = Self::next_unit(&mut state) - 0.5;
        let mut out = Vec::new();
        let mut date = start;
        while date <= end {
            let step = (Self::next_unit(&mut state) - 0.5) * 0.3;
            score = (score + step).clamp(-1.0, 1.0);
            out.push((date, score));
            date += Duration::days(1);
        }
        Ok(out)
    }

    async fn sentiment_correlation(
        &self,
        symbols: &[String],
        days: u32,
    ) -> Result<Vec<Vec<f64>>> {
        let mut series = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let scores: Vec<f64> = self
                .sentiment_series(symbol, days)
                .await?
                .into_iter()
                .map(|(_, s)| s)
                .collect();
            if scores.len() < 2 {
                return Err(ProviderError::DataUnavailable {
                    symbol: symbol.clone(),
                    reason: "need at least two days of sentiment".to_string(),
                });
            }
            series.push(scores);
        }

        let matrix = series
            .iter()
            .map(|a| series.iter().map(|b| pearson(a, b)).collect())
            .collect();
        Ok(matrix)
    }

    async fn screener_row(&self, symbol: &str, screen: Screen) -> Result<Vec<String>> {
        self.validate_symbol(symbol).await?;
        let mut state = Self::seed_for(symbol).rotate_left(41);
        let mut unit = || Self::next_unit(&mut state);

        let row = match screen {
            Screen::Valuation => vec![
                format!("{:.2}", 5.0 + unit() * 45.0),
                format!("{:.2}", 5.0 + unit() * 40.0),
                format!("{:.2}", 0.5 + unit() * 9.5),
                format!("{:.2}", 0.5 + unit() * 7.5),
            ],
            Screen::Financial => vec![
                format!("{:.1}%", unit() * 25.0),
                format!("{:.1}%", unit() * 40.0),
                format!("{:.1}%", unit() * 30.0),
                format!("{:.2}", unit() * 2.5),
            ],
            Screen::Ownership => vec![
                format!("{:.1}%", unit() * 20.0),
                format!("{:.1}%", 30.0 + unit() * 60.0),
                format!("{:.1}%", unit() * 25.0),
                format!("{:.0}K", 100.0 + unit() * 9_900.0),
            ],
            Screen::Performance => vec![
                format!("{:+.1}%", (unit() - 0.5) * 20.0),
                format!("{:+.1}%", (unit() - 0.5) * 40.0),
                format!("{:+.1}%", (unit() - 0.5) * 120.0),
                format!("{:.1}%", 1.0 + unit() * 9.0),
            ],
            Screen::Technical => vec![
                format!("{:.1}", 20.0 + unit() * 60.0),
                format!("{:+.1}%", (unit() - 0.5) * 15.0),
                format!("{:+.1}%", (unit() - 0.5) * 25.0),
                format!("{:.2}", 0.5 + unit() * 2.0),
            ],
        };
        Ok(row)
    }

    async fn validate_coin(&self, coin: &str) -> Result<()> {
        if KNOWN_COINS.contains(&coin) {
            Ok(())
        } else {
            Err(ProviderError::UnknownCoin(coin.to_string()))
        }
    }

    async fn coin_prices(&self, coin: &str, days: u32) -> Result<Vec<(NaiveDate, f64)>> {
        self.validate_coin(coin).await?;
        let end = Local::now().date_naive();
        let start = end - Duration::days(i64::from(days));

        let mut state = Self::seed_for(coin);
        let mut price = 50.0 + (state % 40_000) as f64;
        let mut out = Vec::new();
        let mut date = start;
        while date <= end {
            let step = (Self::next_unit(&mut state) - 0.5) * 0.08;
            price = (price * (1.0 + step)).max(0.01);
            out.push((date, price));
            date += Duration::days(1);
        }
        Ok(out)
    }
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    let (a, b) = (&a[..n], &b[..n]);
    let mean = |xs: &[f64]| xs.iter().sum::<f64>() / n as f64;
    let (ma, mb) = (mean(a), mean(b));
    let mut cov = 0.0;
    let mut va = 0.0;
    let mut vb = 0.0;
    for i in 0..n {
        let (da, db) = (a[i] - ma, b[i] - mb);
        cov += da * db;
        va += da * da;
        vb += db * db;
    }
    if va == 0.0 || vb == 0.0 {
        return 0.0;
    }
    cov / (va.sqrt() * vb.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_validate_symbol() {
        let provider = SampleDataProvider::new();
        assert!(provider.validate_symbol("GME").await.is_ok());
        assert!(provider.validate_symbol("").await.is_err());
        assert!(provider.validate_symbol("NOT-A-TICKER").await.is_err());
    }

    #[tokio::test]
    async fn test_ohlc_is_deterministic_and_weekday_only() {
        let provider = SampleDataProvider::new();
        let (start, end) = window();
        let first = provider.ohlc("GME", start, end, Interval::Daily).await.unwrap();
        let second = provider.ohlc("GME", start, end, Interval::Daily).await.unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
        assert!(
            first
                .iter()
                .all(|c| !matches!(c.date.weekday(), Weekday::Sat | Weekday::Sun))
        );
        assert!(first.iter().all(|c| c.low <= c.high));
    }

    #[tokio::test]
    async fn test_indicator_needs_enough_data() {
        let provider = SampleDataProvider::new();
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2021, 1, 8).unwrap();
        let err = provider
            .indicator_series("GME", Indicator::Sma, 20, start, end)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_sma_series_length() {
        let provider = SampleDataProvider::new();
        let (start, end) = window();
        let closes = SampleDataProvider::closes("GME", start, end);
        let sma = provider
            .indicator_series("GME", Indicator::Sma, 10, start, end)
            .await
            .unwrap();
        assert_eq!(sma.len(), closes.len() - 9);
    }

    #[tokio::test]
    async fn test_rsi_bounded() {
        let provider = SampleDataProvider::new();
        let (start, end) = window();
        let rsi = provider
            .indicator_series("GME", Indicator::Rsi, 14, start, end)
            .await
            .unwrap();
        assert!(rsi.iter().all(|(_, v)| (0.0..=100.0).contains(v)));
    }

    #[tokio::test]
    async fn test_correlation_matrix_shape() {
        let provider = SampleDataProvider::new();
        let (start, end) = window();
        let symbols = vec!["GME".to_string(), "AMC".to_string()];
        let matrix = provider
            .correlation_matrix(&symbols, start, end)
            .await
            .unwrap();
        assert_eq!(matrix.len(), 2);
        assert!((matrix[0][0] - 1.0).abs() < 1e-9);
        assert!((matrix[0][1] - matrix[1][0]).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sentiment_bounded_and_deterministic() {
        let provider = SampleDataProvider::new();
        let first = provider.sentiment_series("GME", 10).await.unwrap();
        let second = provider.sentiment_series("GME", 10).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 10);
        assert!(first.iter().all(|(_, s)| (-1.0..=1.0).contains(s)));
    }

    #[tokio::test]
    async fn test_sentiment_correlation_shape() {
        let provider = SampleDataProvider::new();
        let symbols = vec!["GME".to_string(), "AMC".to_string()];
        let matrix = provider.sentiment_correlation(&symbols, 30).await.unwrap();
        assert_eq!(matrix.len(), 2);
        assert!((matrix[0][0] - 1.0).abs() < 1e-9);
        assert!((matrix[0][1] - matrix[1][0]).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_screener_row_matches_columns() {
        let provider = SampleDataProvider::new();
        for screen in [
            Screen::Valuation,
            Screen::Financial,
            Screen::Ownership,
            Screen::Performance,
            Screen::Technical,
        ] {
            let row = provider.screener_row("GME", screen).await.unwrap();
            assert_eq!(row.len(), screen.columns().len(), "{}", screen.label());
        }
    }

    #[tokio::test]
    async fn test_coins() {
        let provider = SampleDataProvider::new();
        assert!(provider.validate_coin("bitcoin").await.is_ok());
        assert!(provider.validate_coin("beaniecoin").await.is_err());
        let prices = provider.coin_prices("bitcoin", 30).await.unwrap();
        assert_eq!(prices.len(), 31);
    }
}
