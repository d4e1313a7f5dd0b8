use chrono::{DateTime, Utc};

/// One daily OHLC candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Indicator columns derived from the closing prices.
///
/// Each column is either empty (the transform has not run) or exactly as long
/// as the point vector, with `None` in the leading rows where the rolling
/// window is not yet full. The window parameters actually used are kept
/// alongside the values so the renderer can label the traces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    pub ma: Vec<Option<f64>>,
    pub ma_window: Option<usize>,
    pub bb_high: Vec<Option<f64>>,
    pub bb_mid: Vec<Option<f64>>,
    pub bb_low: Vec<Option<f64>>,
    pub bb_window: Option<usize>,
}

/// An ordered run of daily candles plus whatever indicator columns have been
/// attached to it. Rebuilt from scratch on every refresh cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub points: Vec<PricePoint>,
    pub indicators: IndicatorSet,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self {
            points,
            indicators: IndicatorSet::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }
}
