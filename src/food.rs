use anyhow::Result;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::Coords;
use crate::apple_log::AppleLog;
use crate::field::Field;
use crate::snake::Snake;

/// Uniformly random free cell, or `None` once the snake fills the field.
pub fn spawn_food<R: Rng + ?Sized>(field: &Field, snake: &Snake, rng: &mut R) -> Option<Coords> {
    let choices: Vec<Coords> = field.cells().filter(|pos| !snake.contains(*pos)).collect();
    choices.choose(rng).copied()
}

/// First food of a round goes in the middle of the field when that's free.
pub fn initial_food<R: Rng + ?Sized>(field: &Field, snake: &Snake, rng: &mut R) -> Option<Coords> {
    let center = field.center();
    if field.contains(center) && !snake.contains(center) {
        Some(center)
    } else {
        spawn_food(field, snake, rng)
    }
}

/// Moves the food after it was eaten and gives the apple log its turn.
pub fn relocate<R: Rng + ?Sized>(
    field: &Field,
    snake: &Snake,
    apples: &mut AppleLog,
    rng: &mut R,
) -> Result<Option<Coords>> {
    let food = spawn_food(field, snake, rng);
    apples.record_eaten(field, rng)?;
    Ok(food)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::tempdir;

    #[test]
    fn food_lands_inside_and_off_the_snake() {
        let field = Field::new(14, 7).unwrap();
        let snake = Snake::new((3, 10), 8, Right);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..500 {
            let (row, col) = spawn_food(&field, &snake, &mut rng).unwrap();
            assert!(row >= 1 && row <= field.height() - 1);
            assert!(col >= 1 && col <= field.width() - 1);
            assert!(!snake.contains((row, col)));
        }
    }

    #[test]
    fn no_food_when_field_is_full() {
        let field = Field::new(12, 6).unwrap();
        let body: Vec<Coords> = field.cells().collect();
        let snake = Snake::from_body(body, Right);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(spawn_food(&field, &snake, &mut rng), None);
    }

    #[test]
    fn only_free_cell_is_picked() {
        let field = Field::new(12, 6).unwrap();
        let body: Vec<Coords> = field.cells().filter(|pos| *pos != (2, 7)).collect();
        let snake = Snake::from_body(body, Right);
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(spawn_food(&field, &snake, &mut rng), Some((2, 7)));
    }

    #[test]
    fn first_food_is_centered() {
        let field = Field::new(40, 20).unwrap();
        let snake = Snake::new((10, 10), 3, Right);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(initial_food(&field, &snake, &mut rng), Some((10, 20)));

        let snake = Snake::new((10, 21), 3, Right);
        let food = initial_food(&field, &snake, &mut rng).unwrap();
        assert_ne!(food, (10, 20));
        assert!(field.contains(food));
    }

    #[test]
    fn relocate_consults_the_apple_log() {
        let dir = tempdir().unwrap();
        let mut apples = AppleLog::open(dir.path().join("apples")).unwrap();
        let field = Field::new(40, 20).unwrap();
        let snake = Snake::new((10, 10), 3, Right);
        let mut rng = StdRng::seed_from_u64(5);

        let food = relocate(&field, &snake, &mut apples, &mut rng).unwrap().unwrap();

        assert!(field.contains(food));
        assert!(!snake.contains(food));
        assert_eq!(apples.line_count().unwrap(), 1);
    }
}
