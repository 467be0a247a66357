use anyhow::Result;
use crossterm::{
    cursor, execute, queue,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use tracing::error;

use crate::agent::types::AgentEnvelope;
use crate::controller::ProfileRequestController;
use crate::tui::state::build_render_plan;

pub struct TuiApp {
    pub title: String,
    pub controller: ProfileRequestController,
    pub(crate) handler: Option<Box<dyn crate::tui::commands::CommandHandler + Send>>,
    pub(crate) inbox_rx: Option<std::sync::mpsc::Receiver<String>>,
    pub(crate) inbox_tx: Option<std::sync::mpsc::Sender<String>>,
}

impl TuiApp {
    pub fn new(title: impl Into<String>) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        Self {
            title: title.into(),
            controller: ProfileRequestController::new(),
            handler: None,
            inbox_rx: Some(rx),
            inbox_tx: Some(tx),
        }
    }

    pub fn with_handler(
        mut self,
        h: Box<dyn crate::tui::commands::CommandHandler + Send>,
    ) -> Self {
        self.handler = Some(h);
        self
    }

    pub fn sender(&self) -> Option<std::sync::mpsc::Sender<String>> {
        self.inbox_tx.clone()
    }

    pub fn run(&mut self) -> Result<()> {
        struct TuiGuard;
        impl Drop for TuiGuard {
            fn drop(&mut self) {
                let mut stdout = io::stdout();
                let _ = execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show);
                let _ = terminal::disable_raw_mode();
            }
        }
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let _guard = TuiGuard;
        self.event_loop()
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut last_ctrl_c_at: Option<std::time::Instant> = None;
        loop {
            self.drain_inbox();
            self.draw()?;
            if crossterm::event::poll(std::time::Duration::from_millis(50))? {
                match crossterm::event::read()? {
                    crossterm::event::Event::Key(k) => match k.code {
                        // Handle Ctrl+C before generic Char(c) to avoid being shadowed
                        crossterm::event::KeyCode::Char('c')
                            if k.modifiers
                                .contains(crossterm::event::KeyModifiers::CONTROL) =>
                        {
                            let now = std::time::Instant::now();
                            if let Some(prev) = last_ctrl_c_at
                                && now.duration_since(prev) <= std::time::Duration::from_secs(3)
                            {
                                return Ok(());
                            }
                            last_ctrl_c_at = Some(now);
                        }
                        crossterm::event::KeyCode::Esc => {
                            self.controller.reset();
                        }
                        crossterm::event::KeyCode::Enter => {
                            let line = self.controller.username.clone();
                            if line.trim() == "/quit" {
                                return Ok(());
                            }
                            self.dispatch(&line);
                        }
                        crossterm::event::KeyCode::Backspace => {
                            self.controller.username.pop();
                        }
                        crossterm::event::KeyCode::Char(c) => {
                            self.controller.username.push(c);
                        }
                        _ => {}
                    },
                    crossterm::event::Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }
    }

    fn dispatch(&mut self, line: &str) {
        if let Some(mut handler) = self.handler.take() {
            handler.handle(line, self);
            self.handler = Some(handler);
        }
    }

    /// Apply worker messages to the controller. Ordering on the channel
    /// guarantees every tick of a request is handled before its outcome.
    fn drain_inbox(&mut self) {
        let Some(rx) = self.inbox_rx.as_ref() else {
            return;
        };
        let mut drained = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            drained.push(msg);
        }
        for msg in drained {
            if let Some(js) = msg.strip_prefix("::result:") {
                match serde_json::from_str::<AgentEnvelope>(js) {
                    Ok(envelope) => self.controller.complete(envelope),
                    Err(e) => {
                        error!(err=%e, "parse worker envelope");
                        self.controller.fail_network();
                    }
                }
            } else if msg == "::status:error" {
                self.controller.fail_network();
            } else if msg == "::progress:tick" {
                self.controller.advance_progress();
            }
        }
    }

    fn draw(&self) -> Result<()> {
        let mut stdout = io::stdout();
        let (w, h) = terminal::size()?;
        let plan = build_render_plan(&self.title, &self.controller, w, h);
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        if let Some(first) = plan.header_lines.first() {
            queue!(stdout, SetForegroundColor(Color::Cyan))?;
            write!(stdout, "\r{first}\n")?;
            queue!(stdout, ResetColor)?;
        }
        if let Some(second) = plan.header_lines.get(1) {
            queue!(stdout, SetForegroundColor(Color::DarkGrey))?;
            write!(stdout, "\r{second}\n")?;
            queue!(stdout, ResetColor)?;
        }
        for line in &plan.body_lines {
            let color = line_color(line);
            if let Some(color) = color {
                queue!(stdout, SetForegroundColor(color))?;
                write!(stdout, "\r{line}\n")?;
                queue!(stdout, ResetColor)?;
            } else {
                write!(stdout, "\r{line}\n")?;
            }
        }
        queue!(
            stdout,
            cursor::MoveTo(0, h.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine)
        )?;
        write!(stdout, "\r{}", plan.input_line)?;
        stdout.flush()?;
        Ok(())
    }
}

fn line_color(line: &str) -> Option<Color> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("! ") || trimmed == "!" {
        Some(Color::Red)
    } else if trimmed.starts_with("== ") {
        Some(Color::Cyan)
    } else if trimmed.starts_with("[x]") {
        Some(Color::Green)
    } else if trimmed.starts_with("[>]") {
        Some(Color::Yellow)
    } else if trimmed.starts_with("[ ]")
        || trimmed.starts_with("Esc — ")
        || trimmed.starts_with("Enter — ")
    {
        Some(Color::DarkGrey)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RequestState;

    fn app_with_inbox() -> (TuiApp, std::sync::mpsc::Sender<String>) {
        let app = TuiApp::new("test");
        let tx = app.sender().unwrap();
        (app, tx)
    }

    #[test]
    fn drain_applies_ticks_then_result() {
        let (mut app, tx) = app_with_inbox();
        app.controller.username = "torvalds".into();
        app.controller.submit().unwrap();

        tx.send("::progress:tick".into()).unwrap();
        tx.send("::progress:tick".into()).unwrap();
        tx.send(
            r#"::result:{"success":true,"response":{"result":{"developer_summary":"hi"}}}"#.into(),
        )
        .unwrap();
        app.drain_inbox();

        assert_eq!(app.controller.state, RequestState::Results);
        assert_eq!(
            app.controller
                .profile
                .as_ref()
                .unwrap()
                .result
                .developer_summary
                .as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn drain_maps_error_status_to_network_failure() {
        let (mut app, tx) = app_with_inbox();
        app.controller.username = "torvalds".into();
        app.controller.submit().unwrap();

        tx.send("::status:error".into()).unwrap();
        app.drain_inbox();

        assert_eq!(app.controller.state, RequestState::Idle);
        assert_eq!(
            app.controller.error.as_deref(),
            Some("Network error. Please try again.")
        );
    }

    #[test]
    fn drain_treats_garbage_result_as_network_failure() {
        let (mut app, tx) = app_with_inbox();
        app.controller.username = "torvalds".into();
        app.controller.submit().unwrap();

        tx.send("::result:{not json".into()).unwrap();
        app.drain_inbox();

        assert_eq!(app.controller.state, RequestState::Idle);
        assert!(app.controller.error.is_some());
    }

    #[test]
    fn line_colors_follow_prefixes() {
        assert_eq!(line_color("! Analysis Error"), Some(Color::Red));
        assert_eq!(line_color("== Quick Stats =="), Some(Color::Cyan));
        assert_eq!(line_color("  [x] Fetching GitHub profile..."), Some(Color::Green));
        assert_eq!(line_color("  [>] Analyzing repositories..."), Some(Color::Yellow));
        assert_eq!(line_color("  [ ] Processing contributions..."), Some(Color::DarkGrey));
        assert_eq!(line_color("plain text"), None);
    }
}
