use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::traces::ChartPayload;
use crate::ui::{ChartView, StatusBar};

pub struct LayoutManager {
    pub statusbar: StatusBar,
}

impl LayoutManager {
    pub fn new(refresh_secs: u64) -> Self {
        Self {
            statusbar: StatusBar::new(refresh_secs),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, payload: Option<&ChartPayload>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title(frame, payload, chunks[0]);

        match payload {
            Some(payload) => ChartView::new(payload).render(frame, chunks[1]),
            None => self.render_placeholder(frame, chunks[1]),
        }

        if let Some(payload) = payload {
            if payload.layout.legend_below {
                self.render_legend(frame, payload, chunks[2]);
            }
        }

        self.statusbar.render(frame, chunks[3]);
    }

    fn render_title(&self, frame: &mut Frame, payload: Option<&ChartPayload>, area: Rect) {
        let title = payload
            .map(|p| p.layout.title.clone())
            .unwrap_or_else(|| "Bitcoin Price".to_string());
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(block, area);
    }

    fn render_placeholder(&self, frame: &mut Frame, area: Rect) {
        let para = Paragraph::new(Line::from(Span::styled(
            "waiting for first fetch...",
            Style::default().fg(Color::Gray),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(para, area);
    }

    /// One horizontal legend line below the plot, one entry per trace in
    /// payload order.
    fn render_legend(&self, frame: &mut Frame, payload: &ChartPayload, area: Rect) {
        let mut spans = vec![
            Span::styled("█", Style::default().fg(Color::Green)),
            Span::styled("█", Style::default().fg(Color::Red)),
            Span::raw(format!(" {}   ", payload.candlestick.name)),
        ];

        for line in &payload.lines {
            let sample = match (line.style.dashed, line.style.width >= 2) {
                (true, _) => "╌╌",
                (false, true) => "━━",
                (false, false) => "──",
            };
            spans.push(Span::styled(sample, Style::default().fg(line.style.color)));
            spans.push(Span::raw(format!(" {}   ", line.name)));
        }

        let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        frame.render_widget(para, area);
    }
}
