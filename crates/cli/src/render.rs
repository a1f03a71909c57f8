// crates/cli/src/render.rs
//! Terminal rendering of session updates

use bluetune_coordinator::{Notice, SessionUpdate, UpdateCause, ViewState};
use bluetune_core::{Catalog, ConnectionState, ErrorSeverity};
use console::{style, Term};

/// One-line summary of connection and playback
pub fn status_line(view: &ViewState) -> String {
    let connection = match &view.connection {
        ConnectionState::Connected { device_label } => format!("🔊 {}", device_label),
        ConnectionState::Connecting if view.prompt_open => "… waiting for your answer".to_string(),
        ConnectionState::Connecting => "… connecting".to_string(),
        ConnectionState::Disconnected => "✕ not connected".to_string(),
    };

    let marker = if view.playback.is_playing() { "▶" } else { "❚❚" };

    format!(
        "[{}] {} {}  {} {}  vol {:.0}%",
        connection,
        marker,
        view.playback.selected_track().display_name(),
        progress_bar(view, PROGRESS_WIDTH),
        view.time_label(),
        view.playback.volume() * 100.0
    )
}

const PROGRESS_WIDTH: usize = 20;

/// `[=====     ]` filled in proportion to the playback position
pub fn progress_bar(view: &ViewState, width: usize) -> String {
    let filled = ((view.playback.progress() * width as f64) as usize).min(width);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(width - filled))
}

/// Footer: track count, selection and connection status
pub fn footer(view: &ViewState, track_count: usize) -> String {
    format!(
        "{} tracks | Selected: {} | Status: {}",
        track_count,
        view.playback.selected_track().title,
        view.connection.status()
    )
}

/// Catalog listing, marking the selected track
pub fn track_list(catalog: &Catalog, view: Option<&ViewState>) -> Vec<String> {
    let selected = view.map(|v| v.playback.selected_track().id);
    catalog
        .iter()
        .map(|track| {
            let marker = if Some(track.id) == selected { "*" } else { " " };
            format!(
                "{} {:>3}  {:<24} {:<20} {:>6}",
                marker, track.id, track.title, track.artist, track.duration_label
            )
        })
        .collect()
}

/// Writes session updates to the terminal
///
/// Clock updates rewrite the status line in place; everything else starts a
/// new line so notices stay in the scrollback.
pub struct ConsoleRenderer {
    term: Term,
    track_count: usize,
    last_status: Option<String>,
    in_place: bool,
}

impl ConsoleRenderer {
    pub fn new(track_count: usize) -> Self {
        Self {
            term: Term::stdout(),
            track_count,
            last_status: None,
            in_place: false,
        }
    }

    pub fn render(&mut self, update: &SessionUpdate) {
        for notice in &update.notices {
            self.finish_line();
            let _ = self.term.write_line(&styled_notice(notice));
        }

        let status = status_line(&update.view);
        if self.last_status.as_deref() == Some(status.as_str()) && update.notices.is_empty() {
            return;
        }

        let result = if update.cause == UpdateCause::Transport && self.term.is_term() {
            self.in_place = true;
            self.term
                .clear_line()
                .and_then(|_| self.term.write_str(&status))
        } else {
            self.finish_line();
            self.term.write_line(&status)
        };

        if let Err(e) = result {
            log::debug!("Failed to write status: {}", e);
        }
        self.last_status = Some(status);
    }

    pub fn print_status(&mut self, view: &ViewState) {
        self.finish_line();
        let _ = self.term.write_line(&status_line(view));
        let _ = self
            .term
            .write_line(&style(footer(view, self.track_count)).dim().to_string());
    }

    pub fn print_lines<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.finish_line();
        for line in lines {
            let _ = self.term.write_line(&line);
        }
    }

    pub fn print_error(&mut self, message: &str) {
        self.finish_line();
        let _ = self.term.write_line(&style(message).red().to_string());
    }

    fn finish_line(&mut self) {
        if self.in_place {
            let _ = self.term.write_line("");
            self.in_place = false;
        }
    }
}

fn styled_notice(notice: &Notice) -> String {
    let text = notice.to_string();
    match notice {
        Notice::Error(error) => match error.severity() {
            ErrorSeverity::Informational => style(text).yellow().to_string(),
            ErrorSeverity::Recoverable | ErrorSeverity::UsageError => {
                style(text).red().to_string()
            }
        },
        Notice::Connected { .. } => style(text).green().bold().to_string(),
        Notice::ConfirmPrompt => style(text).yellow().bold().to_string(),
        Notice::ManualInstructions(_) => style(text).cyan().to_string(),
        _ => style(text).dim().to_string(),
    }
}
