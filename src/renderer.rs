use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::{Difficulty, GLYPH_CELL, GLYPH_FOOD, GLYPH_POWER_UP, GridSize, THEME};
use crate::game::{GameStatus, Snapshot};
use crate::snake::Position;
use crate::ui::hud::{HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Terminal columns used per logical cell.
const CELL_WIDTH: u16 = 2;

/// Renders one frame: the speed menu when `snapshot` is `None`, the board otherwise.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: Option<&Snapshot>,
    selected: Difficulty,
    hud_info: &HudInfo,
) {
    let area = frame.area();
    let Some(snapshot) = snapshot else {
        render_start_menu(frame, area, selected, &hud_info.top_three);
        return;
    };

    let play_area = render_hud(frame, area, snapshot, hud_info);
    let board = board_rect(play_area, snapshot.grid);

    let block = Block::bordered()
        .border_style(Style::new().fg(THEME.border_fg))
        .style(Style::new().bg(THEME.grid_bg));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_items(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);

    match snapshot.status {
        GameStatus::Paused => render_pause_menu(frame, board),
        GameStatus::GameOver => render_game_over_menu(
            frame,
            board,
            snapshot.score,
            hud_info.previous_best,
            snapshot.death_reason,
        ),
        GameStatus::Running => {}
    }
}

/// Centers a bordered board of `grid` cells inside `area`, shrinking it to fit.
fn board_rect(area: Rect, grid: GridSize) -> Rect {
    let width = grid
        .width
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid.height.saturating_add(2).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_items(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let buffer = frame.buffer_mut();
    if let Some((x, y)) = snapshot
        .food
        .and_then(|food| logical_to_terminal(inner, snapshot.grid, food))
    {
        buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(THEME.food));
    }
    if let Some((x, y)) = snapshot
        .power_up
        .and_then(|power_up| logical_to_terminal(inner, snapshot.grid, power_up))
    {
        buffer.set_string(
            x,
            y,
            GLYPH_POWER_UP,
            Style::new()
                .fg(THEME.power_up)
                .add_modifier(Modifier::BOLD),
        );
    }
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot) {
    let head_color = if snapshot.speed_boost_active {
        THEME.snake_head_boosted
    } else {
        THEME.snake_head
    };

    let buffer = frame.buffer_mut();
    // Tail first so the head stays visible when it overlaps the body.
    for (index, segment) in snapshot.snake.iter().enumerate().rev() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };
        let color = if index == 0 {
            head_color
        } else {
            THEME.snake_body
        };
        buffer.set_string(x, y, GLYPH_CELL, Style::new().fg(color));
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
