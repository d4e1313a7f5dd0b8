use chrono::{DateTime, Utc};
use ratatui::style::Color;

use crate::data::series::PriceSeries;

pub const MA_COLOR: Color = Color::Rgb(255, 165, 0);
pub const BAND_COLOR: Color = Color::Blue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: u16,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandlestickTrace {
    pub name: String,
    pub x: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineTrace {
    pub name: String,
    pub style: LineStyle,
    pub x: Vec<DateTime<Utc>>,
    pub y: Vec<Option<f64>>,
}

/// Axis and legend descriptor for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub title: String,
    pub y_label: String,
    /// Anchor for the monthly x-axis ticks: the series' first timestamp.
    pub x_anchor: Option<DateTime<Utc>>,
    /// Horizontal legend placed below the plot area.
    pub legend_below: bool,
}

/// Rendering-ready bundle for one refresh cycle: the candlestick trace, the
/// four indicator line traces in fixed order (MA, BB low, BB mid, BB high),
/// and the layout. Replaced wholesale on the next publish.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    pub candlestick: CandlestickTrace,
    pub lines: Vec<LineTrace>,
    pub layout: ChartLayout,
}

/// Maps an enriched series onto the chart payload.
///
/// Total over any well-formed series: indicator columns that were never
/// computed come out as all-`None` line traces, and an empty series yields an
/// empty candlestick trace.
pub fn render(series: &PriceSeries) -> ChartPayload {
    let x: Vec<DateTime<Utc>> = series.points.iter().map(|p| p.timestamp).collect();
    let ind = &series.indicators;

    let column = |values: &[Option<f64>]| -> Vec<Option<f64>> {
        if values.is_empty() {
            vec![None; series.len()]
        } else {
            values.to_vec()
        }
    };

    let ma_name = match ind.ma_window {
        Some(window) => format!("Moving Average ({window})"),
        None => "Moving Average".to_string(),
    };

    let band = |name: &str, values: &[Option<f64>], dashed: bool| LineTrace {
        name: name.to_string(),
        style: LineStyle {
            color: BAND_COLOR,
            width: 1,
            dashed,
        },
        x: x.clone(),
        y: column(values),
    };

    ChartPayload {
        candlestick: CandlestickTrace {
            name: "BTC/USD".to_string(),
            x: x.clone(),
            open: series.points.iter().map(|p| p.open).collect(),
            high: series.points.iter().map(|p| p.high).collect(),
            low: series.points.iter().map(|p| p.low).collect(),
            close: series.points.iter().map(|p| p.close).collect(),
        },
        lines: vec![
            LineTrace {
                name: ma_name,
                style: LineStyle {
                    color: MA_COLOR,
                    width: 2,
                    dashed: false,
                },
                x: x.clone(),
                y: column(&ind.ma),
            },
            band("Bollinger Bands Low", &ind.bb_low, false),
            band("Bollinger Bands Mid", &ind.bb_mid, true),
            band("Bollinger Bands High", &ind.bb_high, false),
        ],
        layout: ChartLayout {
            title: "Bitcoin Price".to_string(),
            y_label: "Price (USD)".to_string(),
            x_anchor: series.first_timestamp(),
            legend_below: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::indicators::{add_bollinger_bands, add_moving_average};
    use crate::data::series::test_util::daily_closes;

    #[test]
    fn trace_order_is_fixed() {
        let series = add_bollinger_bands(
            add_moving_average(daily_closes(&[1.0; 30]), 20),
            10,
            1.5,
        );
        let payload = render(&series);
        let names: Vec<&str> = payload.lines.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Moving Average (20)",
                "Bollinger Bands Low",
                "Bollinger Bands Mid",
                "Bollinger Bands High",
            ]
        );
    }

    #[test]
    fn total_over_a_bare_series() {
        // No transforms ran: still one candlestick and four all-None lines.
        let payload = render(&daily_closes(&[10.0, 11.0, 12.0]));
        assert_eq!(payload.candlestick.close.len(), 3);
        assert_eq!(payload.lines.len(), 4);
        for line in &payload.lines {
            assert_eq!(line.y.len(), 3);
            assert!(line.y.iter().all(|v| v.is_none()));
        }
        assert_eq!(payload.lines[0].name, "Moving Average");
    }

    #[test]
    fn total_over_an_empty_series() {
        let payload = render(&daily_closes(&[]));
        assert!(payload.candlestick.x.is_empty());
        assert_eq!(payload.lines.len(), 4);
        assert!(payload.layout.x_anchor.is_none());
    }

    #[test]
    fn layout_matches_the_dashboard() {
        let series = daily_closes(&[10.0, 20.0]);
        let payload = render(&series);
        assert_eq!(payload.layout.title, "Bitcoin Price");
        assert_eq!(payload.layout.y_label, "Price (USD)");
        assert_eq!(payload.layout.x_anchor, series.first_timestamp());
        assert!(payload.layout.legend_below);
    }

    #[test]
    fn styles_distinguish_ma_from_bands() {
        let payload = render(&daily_closes(&[1.0, 2.0]));
        let ma = &payload.lines[0].style;
        assert_eq!(ma.color, MA_COLOR);
        assert_eq!(ma.width, 2);
        assert!(!ma.dashed);

        assert!(!payload.lines[1].style.dashed);
        assert!(payload.lines[2].style.dashed);
        assert!(!payload.lines[3].style.dashed);
        for band in &payload.lines[1..] {
            assert_eq!(band.style.color, BAND_COLOR);
            assert_eq!(band.style.width, 1);
        }
    }

    #[test]
    fn indicator_values_carry_through() {
        let series = add_moving_average(daily_closes(&[10.0, 20.0, 30.0]), 2);
        let payload = render(&series);
        assert_eq!(payload.lines[0].y, vec![None, Some(15.0), Some(25.0)]);
    }
}
