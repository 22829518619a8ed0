use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::THEME;
use crate::game::Snapshot;

const SEPARATOR: &str = " │ ";

/// Values shown by the HUD that do not come from the engine snapshot.
#[derive(Debug, Clone, Default)]
pub struct HudInfo {
    /// Ledger entries formatted for display, "0" when empty.
    pub top_three: String,
    /// Best ledger score before the last game over, for the game-over screen.
    pub previous_best: Option<u32>,
    /// Last persistence failure, shown until a later write succeeds.
    pub ledger_error: Option<String>,
}

/// Renders the two HUD rows under `area` and returns the play area above them.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, snapshot: &Snapshot, info: &HudInfo) -> Rect {
    let [play_area, score_area, status_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(top_info_line(snapshot, &info.top_three, score_area.width))
            .alignment(Alignment::Center),
        score_area,
    );
    frame.render_widget(
        Paragraph::new(status_line(snapshot, info)).alignment(Alignment::Center),
        status_area,
    );

    play_area
}

fn top_info_line(snapshot: &Snapshot, top_three: &str, available_width: u16) -> Line<'static> {
    let compact = top_info_width(snapshot, top_three, false) > usize::from(available_width);
    let labels = labels(compact);
    let value = Style::default()
        .fg(THEME.hud_score)
        .add_modifier(Modifier::BOLD);
    let score_style = if snapshot.score_multiplier_active {
        value.fg(THEME.hud_effect)
    } else {
        value
    };

    Line::from(vec![
        Span::raw(format!("{}: ", labels[0])),
        Span::styled(snapshot.score.to_string(), score_style),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[1])),
        Span::styled(snapshot.snake.len().to_string(), value),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[2])),
        Span::styled(format!("{}ms", snapshot.tick_delay_ms), value),
        Span::raw(SEPARATOR),
        Span::raw(format!("{}: ", labels[3])),
        Span::styled(top_three.to_string(), value),
    ])
}

fn labels(compact: bool) -> [&'static str; 4] {
    if compact {
        ["S", "L", "D", "H"]
    } else {
        ["Score", "Length", "Delay", "High"]
    }
}

fn top_info_width(snapshot: &Snapshot, top_three: &str, compact: bool) -> usize {
    let [score, length, delay, high] = labels(compact);
    let text = format!(
        "{score}: {}{SEPARATOR}{length}: {}{SEPARATOR}{delay}: {}ms{SEPARATOR}{high}: {top_three}",
        snapshot.score,
        snapshot.snake.len(),
        snapshot.tick_delay_ms,
    );
    text.width()
}

fn status_line(snapshot: &Snapshot, info: &HudInfo) -> Line<'static> {
    if let Some(error) = &info.ledger_error {
        return Line::from(Span::styled(
            format!("scores not saved: {error}"),
            Style::default().fg(Color::LightRed),
        ));
    }

    let effect_style = Style::default().fg(THEME.hud_effect);
    let mut spans = Vec::new();
    for (label, remaining) in [
        ("Speed x2", snapshot.speed_boost_remaining_ms),
        ("Score x2", snapshot.score_multiplier_remaining_ms),
    ] {
        let Some(remaining) = remaining else {
            continue;
        };
        if !spans.is_empty() {
            spans.push(Span::raw(SEPARATOR));
        }
        spans.push(Span::styled(
            format!("{label} {}", format_seconds(remaining)),
            effect_style,
        ));
    }

    if spans.is_empty() {
        spans.push(Span::styled(
            "[P] Pause  [Q] Quit",
            Style::default().fg(THEME.menu_footer),
        ));
    }
    Line::from(spans)
}

fn format_seconds(ms: u64) -> String {
    format!("{}.{}s", ms / 1_000, (ms % 1_000) / 100)
}
