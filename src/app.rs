use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use ratatui::{DefaultTerminal, Frame};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::data::{add_bollinger_bands, add_moving_average, FetchError, OhlcClient};
use crate::ui::{render, ChartPayload, LayoutManager};

/// One fetch → transform → render pass. Everything in it is rebuilt from
/// scratch; nothing is shared with the previous cycle.
pub async fn run_cycle(
    client: &OhlcClient,
    config: &AppConfig,
) -> Result<ChartPayload, FetchError> {
    let series = client
        .fetch_ohlc(&config.coin_id, &config.vs_currency, config.days)
        .await?;
    let series = add_moving_average(series, config.ma_window);
    let series = add_bollinger_bands(series, config.bb_window, config.bb_std_dev);
    Ok(render(&series))
}

/// Application context: owns the config, the HTTP client, the published
/// chart, and the refresh loop. Passed explicitly instead of living in a
/// module-level singleton.
pub struct App {
    config: AppConfig,
    client: OhlcClient,
    payload: Option<ChartPayload>,
    layout: LayoutManager,
    ticks: u64,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let layout = LayoutManager::new(config.refresh_secs);
        Self {
            config,
            client: OhlcClient::new(),
            payload: None,
            layout,
            ticks: 0,
            should_quit: false,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Event loop: one recurring refresh interval plus terminal input, both
    /// served by the same task. The first `tick()` resolves immediately, so
    /// the initial render happens at startup rather than after the first
    /// period. A cycle that outlasts the period delays the next tick; cycles
    /// never overlap.
    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut ticker = interval(Duration::from_secs(self.config.refresh_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut events = EventStream::new();

        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh().await;
                }
                maybe_event = events.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!(%err, "terminal event error"),
                        None => self.should_quit = true,
                    }
                }
            }
        }

        info!(ticks = self.ticks, "shutting down");
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.layout.render(frame, self.payload.as_ref(), area);
    }

    async fn refresh(&mut self) {
        self.ticks += 1;
        debug!(tick = self.ticks, "refresh cycle started");
        let result = run_cycle(&self.client, &self.config).await;
        self.publish(result);
    }

    /// Publishes a cycle result. A successful cycle replaces the chart
    /// wholesale; a failed one keeps the previous chart on screen and only
    /// updates the status line.
    fn publish(&mut self, result: Result<ChartPayload, FetchError>) {
        match result {
            Ok(payload) => {
                self.payload = Some(payload);
                self.layout.statusbar.last_refresh = Some(chrono::Utc::now());
                self.layout.statusbar.last_error = None;
            }
            Err(err) => {
                error!(%err, "refresh cycle failed, keeping previous chart");
                self.layout.statusbar.last_error = Some(err.to_string());
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else { return };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::series::test_util::daily_closes;
    use reqwest::StatusCode;

    fn payload_for(closes: &[f64]) -> ChartPayload {
        render(&daily_closes(closes))
    }

    #[test]
    fn successful_publish_replaces_the_chart() {
        let mut app = App::new(AppConfig::default());
        app.publish(Ok(payload_for(&[1.0, 2.0])));
        app.publish(Ok(payload_for(&[3.0, 4.0])));

        let published = app.payload.as_ref().unwrap();
        assert_eq!(published.candlestick.close, vec![3.0, 4.0]);
        assert!(app.layout.statusbar.last_error.is_none());
        assert!(app.layout.statusbar.last_refresh.is_some());
    }

    #[test]
    fn failed_cycle_keeps_the_previous_chart() {
        let mut app = App::new(AppConfig::default());
        app.publish(Ok(payload_for(&[1.0, 2.0])));
        app.publish(Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)));

        let published = app.payload.as_ref().unwrap();
        assert_eq!(published.candlestick.close, vec![1.0, 2.0]);
        assert!(app.layout.statusbar.last_error.is_some());
    }

    #[test]
    fn failure_before_any_success_publishes_nothing() {
        let mut app = App::new(AppConfig::default());
        app.publish(Err(FetchError::Status(StatusCode::BAD_GATEWAY)));
        assert!(app.payload.is_none());
        assert!(app.layout.statusbar.last_error.is_some());
    }

    #[test]
    fn quit_keys_stop_the_loop() {
        use crossterm::event::{KeyEvent, KeyEventState};

        let mut app = App::new(AppConfig::default());
        assert!(!app.should_quit);

        app.handle_event(Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
        assert!(app.should_quit);
    }

    #[test]
    fn key_release_is_ignored() {
        use crossterm::event::{KeyEvent, KeyEventState};

        let mut app = App::new(AppConfig::default());
        app.handle_event(Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }));
        assert!(!app.should_quit);
    }
}
