use rand::Rng;

use crate::config::{GridSize, MAX_PLACEMENT_ATTEMPTS};
use crate::snake::{Position, Snake};

/// Picks a free cell by rejection sampling against the snake and `extra`.
///
/// Falls back to a scan of the whole board after [`MAX_PLACEMENT_ATTEMPTS`]
/// rejected draws, and returns `None` only when no cell is free.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    bounds: GridSize,
    snake: &Snake,
    extra: &[Position],
) -> Option<Position> {
    let is_free = |position: Position| !snake.occupies(position) && !extra.contains(&position);

    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Position {
            x: rng.gen_range(0..i32::from(bounds.width)),
            y: rng.gen_range(0..i32::from(bounds.height)),
        };
        if is_free(candidate) {
            return Some(candidate);
        }
    }

    log::debug!("rejection sampling exhausted, scanning the board for free cells");
    let free: Vec<Position> = (0..i32::from(bounds.height))
        .flat_map(|y| (0..i32::from(bounds.width)).map(move |x| Position { x, y }))
        .filter(|cell| is_free(*cell))
        .collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.gen_range(0..free.len())])
}

/// Power-up lying on the board, waiting to be collected.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PowerUp {
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::spawn_position;
    use crate::config::GridSize;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    fn top_row_snake() -> Snake {
        Snake::new(Position { x: 0, y: 0 }, Direction::Left, 3)
    }

    #[test]
    fn spawn_never_overlaps_snake_or_extra_cells() {
        let mut rng = StdRng::seed_from_u64(7);
        let snake = top_row_snake();
        let food = Position { x: 3, y: 0 };
        let bounds = GridSize {
            width: 8,
            height: 6,
        };

        for _ in 0..200 {
            let position = spawn_position(&mut rng, bounds, &snake, &[food])
                .expect("board has free cells");
            assert!(!snake.occupies(position));
            assert_ne!(position, food);
            assert!(position.is_within_bounds(bounds));
        }
    }

    #[test]
    fn spawn_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let snake = top_row_snake();
        let bounds = GridSize {
            width: 2,
            height: 2,
        };
        let taken = [Position { x: 0, y: 1 }];

        assert_eq!(
            spawn_position(&mut rng, bounds, &snake, &taken),
            Some(Position { x: 1, y: 1 })
        );
    }

    #[test]
    fn spawn_gives_up_on_a_full_board() {
        let mut rng = StdRng::seed_from_u64(3);
        let snake = top_row_snake();
        let bounds = GridSize {
            width: 3,
            height: 1,
        };

        assert_eq!(spawn_position(&mut rng, bounds, &snake, &[]), None);
    }
}
