use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub struct StatusBar {
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub refresh_secs: u64,
}

impl StatusBar {
    pub fn new(refresh_secs: u64) -> Self {
        Self {
            last_refresh: None,
            last_error: None,
            refresh_secs,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let healthy = self.last_error.is_none();
        let status_color = if healthy { Color::Green } else { Color::Red };
        let status_text = if healthy { "●" } else { "○" };

        let mut spans = vec![
            Span::styled(
                format!("{} ", status_text),
                Style::default().fg(status_color),
            ),
        ];

        match (&self.last_error, self.last_refresh) {
            (Some(error), _) => {
                spans.push(Span::styled("STALE", Style::default().fg(Color::Red)));
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Gray),
                ));
            }
            (None, Some(at)) => {
                spans.push(Span::styled("LIVE", Style::default().fg(Color::White)));
                spans.push(Span::raw(format!(
                    " updated {}",
                    at.format("%H:%M:%S UTC")
                )));
            }
            (None, None) => {
                spans.push(Span::styled("LOADING", Style::default().fg(Color::White)));
            }
        }

        spans.push(Span::raw(" | "));
        spans.push(Span::raw(format!("refresh {}s", self.refresh_secs)));
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("Q", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(":Quit"));

        let para = Paragraph::new(Line::from(spans)).block(Block::default());
        frame.render_widget(para, area);
    }
}
