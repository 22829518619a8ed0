use std::collections::VecDeque;

use crate::config::GridSize;
use crate::input::Direction;

/// Board cell, `(0, 0)` at the top-left corner.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Whether the cell exists on a `bounds` sized board.
    #[must_use]
    pub fn is_within_bounds(self, bounds: GridSize) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.x < i32::from(bounds.width)
            && self.y < i32::from(bounds.height)
    }

    /// Returns this position clamped into bounds, each axis independently.
    #[must_use]
    pub fn clamped(self, bounds: GridSize) -> Self {
        Self {
            x: self.x.clamp(0, i32::from(bounds.width) - 1),
            y: self.y.clamp(0, i32::from(bounds.height) - 1),
        }
    }

    /// Returns the neighbouring cell one unit away in `direction`.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Segmented snake body, head first.
///
/// `target_len` is the length the body is growing towards; a move appends
/// the vacated tail cell back while the body is shorter than the target.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Position>,
    direction: Direction,
    target_len: usize,
}

impl Snake {
    /// Creates a straight snake of `len` cells with the head at `head`,
    /// the body extending opposite to `direction`.
    #[must_use]
    pub fn new(head: Position, direction: Direction, len: usize) -> Self {
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(len);
        let mut cell = head;
        for _ in 0..len.max(1) {
            body.push_back(cell);
            cell = cell.step(behind);
        }

        Self {
            target_len: body.len(),
            body,
            direction,
        }
    }

    /// Builds a snake from `segments`, head first, already at full length.
    #[must_use]
    pub fn from_segments(segments: Vec<Position>, direction: Direction) -> Self {
        debug_assert!(!segments.is_empty());
        Self {
            target_len: segments.len(),
            body: VecDeque::from(segments),
            direction,
        }
    }

    /// Raises the target length by one; the body catches up on the next move.
    pub fn grow(&mut self) {
        self.target_len += 1;
    }

    /// Moves the head to `next_head` and shifts every trailing segment
    /// into its predecessor's previous cell.
    pub fn advance_to(&mut self, next_head: Position) {
        self.body.push_front(next_head);
        if self.body.len() > self.target_len {
            let _ = self.body.pop_back();
        }
    }

    /// Commits a new heading. Callers are responsible for rejecting reversals.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    #[must_use]
    pub fn head(&self) -> Position {
        *self
            .body
            .front()
            .expect("snake body is never empty")
    }

    /// Returns the head position one step ahead in the current direction.
    #[must_use]
    pub fn next_head_position(&self) -> Position {
        self.head().step(self.direction)
    }

    #[must_use]
    pub fn occupies(&self, position: Position) -> bool {
        self.body.contains(&position)
    }

    /// Head shares a cell with another segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|cell| *cell == head)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Length the body is growing towards.
    #[must_use]
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }
}
