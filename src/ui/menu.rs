use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::{Difficulty, THEME};
use crate::game::DeathReason;

/// Draws the speed selection screen.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, selected: Difficulty, top_three: &str) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(7),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from("WELCOME TO SNAKE"),
            Line::from("Choose the speed of the snake"),
        ])
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(THEME.menu_title)
                .add_modifier(Modifier::BOLD),
        ),
        title_row,
    );

    let mut body: Vec<Line> = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(index, difficulty)| {
            let marker = if *difficulty == selected { ">" } else { " " };
            let line = Line::from(format!(
                "{marker} [{}] {:<6} {:>3} ms",
                index + 1,
                difficulty.label(),
                difficulty.initial_delay_ms()
            ));
            if *difficulty == selected {
                line.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                line
            }
        })
        .collect();
    body.push(Line::from(""));
    body.push(Line::from(format!("High scores: {top_three}")));

    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" speed ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("[1-3]/[Enter] Start  [X] Reset scores  [Q] Quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(THEME.menu_footer)),
        footer_row,
    );
}

/// Draws the pause screen as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("Effect timers are frozen"),
        Line::from(""),
        Line::from("[P] Resume  [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    previous_best: Option<u32>,
    death_reason: Option<DeathReason>,
) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);

    let best = previous_best.unwrap_or(0);
    let is_new_high = score > best;
    let lines = vec![
        Line::from("GAME OVER").style(
            Style::default()
                .fg(THEME.food)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(format!(
            "Best: {}",
            if is_new_high { score } else { best }
        )),
        Line::from(match death_reason {
            Some(DeathReason::WallCollision) => "Cause: hit wall",
            Some(DeathReason::SelfCollision) => "Cause: hit yourself",
            None => "",
        }),
        Line::from(if is_new_high { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[R] Restart  [Enter] Speed menu"),
        Line::from("[X] Reset high scores  [Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
