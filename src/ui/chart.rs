use chrono::Months;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::traces::ChartPayload;

const AXIS_GUTTER: u16 = 13;

/// Draws one ChartPayload into the terminal: candle wicks and bodies, the
/// indicator line overlays in trace order, the price axis gutter, and the
/// monthly x-axis labels.
pub struct ChartView<'a> {
    payload: &'a ChartPayload,
}

impl<'a> ChartView<'a> {
    pub fn new(payload: &'a ChartPayload) -> Self {
        Self { payload }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let candles = &self.payload.candlestick;
        if candles.x.is_empty() || area.width < AXIS_GUTTER + 5 || area.height < 6 {
            return;
        }

        // Rows: 1 top pad, plot, 1 month-label row, 1 price summary row.
        let chart_width = area.width.saturating_sub(AXIS_GUTTER);
        let chart_height = area.height.saturating_sub(3);
        let candle_width = (chart_width as usize / candles.x.len().max(1)).max(1);

        let inner = Rect {
            x: area.x + AXIS_GUTTER,
            y: area.y + 1,
            width: chart_width,
            height: chart_height,
        };

        let (min_price, max_price) = self.price_bounds();
        let price_range = (max_price - min_price).max(0.0001);

        let value_to_y = |value: f64| -> u16 {
            let clamped = value.clamp(min_price, max_price);
            inner.y + ((max_price - clamped) / price_range * (chart_height - 1) as f64) as u16
        };

        self.render_candles(frame, inner, candle_width, value_to_y);
        self.render_lines(frame, inner, candle_width, value_to_y);
        self.render_price_axis(frame, area, inner, min_price, price_range);
        self.render_month_labels(frame, area, inner, candle_width);
        self.render_price_summary(frame, area);
    }

    /// Scale covers the candles and every defined line value, so bands that
    /// break out of the candle range stay on screen.
    fn price_bounds(&self) -> (f64, f64) {
        let candles = &self.payload.candlestick;
        let mut min = f64::MAX;
        let mut max = f64::MIN;

        for (high, low) in candles.high.iter().zip(&candles.low) {
            min = min.min(*low);
            max = max.max(*high);
        }
        for line in &self.payload.lines {
            for value in line.y.iter().flatten() {
                min = min.min(*value);
                max = max.max(*value);
            }
        }

        (min, max)
    }

    fn render_candles(
        &self,
        frame: &mut Frame,
        inner: Rect,
        candle_width: usize,
        value_to_y: impl Fn(f64) -> u16,
    ) {
        let candles = &self.payload.candlestick;

        for idx in 0..candles.x.len() {
            let x = inner.x + (idx * candle_width) as u16 + candle_width as u16 / 2;
            if x >= inner.x + inner.width {
                break;
            }

            let open = candles.open[idx];
            let high = candles.high[idx];
            let low = candles.low[idx];
            let close = candles.close[idx];

            let high_y = value_to_y(high);
            let low_y = value_to_y(low);
            let open_y = value_to_y(open);
            let close_y = value_to_y(close);

            let is_bullish = close >= open;
            let color = if is_bullish { Color::Green } else { Color::Red };

            if high_y < low_y {
                for y in high_y..=low_y {
                    if y >= inner.y && y < inner.y + inner.height {
                        let cell = &mut frame.buffer_mut()[(x, y)];
                        cell.set_char('│').set_fg(color);
                    }
                }
            }

            let body_top = open_y.min(close_y);
            let body_bottom = open_y.max(close_y);
            for y in body_top..=body_bottom {
                if y >= inner.y && y < inner.y + inner.height {
                    let cell = &mut frame.buffer_mut()[(x, y)];
                    cell.set_char('█').set_fg(color);
                }
            }
        }
    }

    /// Overlays the line traces in payload order, so later traces win the
    /// cell when two land on the same spot.
    fn render_lines(
        &self,
        frame: &mut Frame,
        inner: Rect,
        candle_width: usize,
        value_to_y: impl Fn(f64) -> u16,
    ) {
        for line in &self.payload.lines {
            let glyph = if line.style.width >= 2 { '━' } else { '─' };

            for (idx, value) in line.y.iter().enumerate() {
                let Some(value) = value else { continue };
                let y = value_to_y(*value);
                if y < inner.y || y >= inner.y + inner.height {
                    continue;
                }

                for dx in 0..candle_width {
                    let x = inner.x + (idx * candle_width + dx) as u16;
                    if x >= inner.x + inner.width {
                        break;
                    }
                    if line.style.dashed && x % 2 == 0 {
                        continue;
                    }
                    let cell = &mut frame.buffer_mut()[(x, y)];
                    cell.set_char(glyph).set_fg(line.style.color);
                }
            }
        }
    }

    fn render_price_axis(
        &self,
        frame: &mut Frame,
        area: Rect,
        inner: Rect,
        min_price: f64,
        price_range: f64,
    ) {
        let max_price = min_price + price_range;
        let chart_height = inner.height;

        let label_count = 5.min(chart_height as usize / 2);
        for i in 0..=label_count {
            let y = inner.y
                + ((i as u16) * (chart_height.saturating_sub(1)) / label_count.max(1) as u16);
            let price = max_price - (i as f64 / label_count.max(1) as f64) * price_range;
            let label = format!("{:>11.2}", price);

            for (j, ch) in label.chars().enumerate() {
                let x_pos = area.x + (j as u16);
                if x_pos < area.x + AXIS_GUTTER && y < area.y + area.height {
                    let cell = &mut frame.buffer_mut()[(x_pos, y)];
                    cell.set_char(ch).set_fg(Color::Gray);
                }
            }
        }

        let axis_label = Paragraph::new(Line::from(Span::styled(
            self.payload.layout.y_label.clone(),
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(
            axis_label,
            Rect {
                x: area.x,
                y: area.y,
                width: AXIS_GUTTER.min(area.width),
                height: 1,
            },
        );
    }

    /// Date ticks: one per month, anchored at the series' first timestamp.
    fn render_month_labels(
        &self,
        frame: &mut Frame,
        area: Rect,
        inner: Rect,
        candle_width: usize,
    ) {
        let candles = &self.payload.candlestick;
        let Some(anchor) = self.payload.layout.x_anchor.or_else(|| candles.x.first().copied())
        else {
            return;
        };
        let label_y = inner.y + inner.height;
        if label_y >= area.y + area.height {
            return;
        }

        let mut months_ahead: u32 = 0;
        let mut next_tick = Some(anchor);
        for (idx, timestamp) in candles.x.iter().enumerate() {
            let Some(tick) = next_tick else { break };
            if *timestamp < tick {
                continue;
            }

            let label = timestamp.format("%b %d").to_string();
            let start_x = inner.x + (idx * candle_width) as u16;
            for (j, ch) in label.chars().enumerate() {
                let x = start_x + j as u16;
                if x >= inner.x + inner.width {
                    break;
                }
                let cell = &mut frame.buffer_mut()[(x, label_y)];
                cell.set_char(ch).set_fg(Color::Gray);
            }

            months_ahead += 1;
            next_tick = anchor.checked_add_months(Months::new(months_ahead));
        }
    }

    fn render_price_summary(&self, frame: &mut Frame, area: Rect) {
        let closes = &self.payload.candlestick.close;
        let (Some(first), Some(latest)) = (closes.first(), closes.last()) else {
            return;
        };

        let change = latest - first;
        let change_pct = if *first != 0.0 {
            (change / first) * 100.0
        } else {
            0.0
        };
        let change_color = if change >= 0.0 {
            Color::Green
        } else {
            Color::Red
        };

        let text = Line::from(vec![
            Span::styled("Price: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.2}", latest),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{:+.2} ({:+.2}%)", change, change_pct),
                Style::default().fg(change_color),
            ),
        ]);

        let para = Paragraph::new(text);
        frame.render_widget(
            para,
            Rect {
                x: area.x + AXIS_GUTTER,
                y: area.y + area.height - 1,
                width: area.width.saturating_sub(AXIS_GUTTER),
                height: 1,
            },
        );
    }
}
