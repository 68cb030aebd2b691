use crate::Coords;

use anyhow::{Result, ensure};
use rand::Rng;

pub const MIN_WIDTH: u16 = 12;
pub const MIN_HEIGHT: u16 = 6;

/// The playing field: the interior of a bordered `width` x `height` screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    width: i16,
    height: i16,
}

impl Field {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        ensure!(
            width >= MIN_WIDTH && height >= MIN_HEIGHT,
            "terminal is {}x{}, need at least {}x{}", width, height, MIN_WIDTH, MIN_HEIGHT
        );

        let width = width.min(i16::MAX as u16) as i16;
        let height = height.min(i16::MAX as u16) as i16;
        Ok(Field { width, height })
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn contains(&self, pos: Coords) -> bool {
        let (row, col) = pos;
        row >= 1 && col >= 1 && row <= self.height - 2 && col <= self.width - 2
    }

    pub fn center(&self) -> Coords {
        (self.height / 2, self.width / 2)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coords> {
        let (rows, cols) = (self.height - 2, self.width - 2);
        (1..=rows).flat_map(move |row| (1..=cols).map(move |col| (row, col)))
    }

    pub fn cell_count(&self) -> usize {
        (self.height - 2) as usize * (self.width - 2) as usize
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Coords {
        (rng.gen_range(1..=self.height - 2), rng.gen_range(1..=self.width - 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn rejects_tiny_terminals() {
        assert!(Field::new(MIN_WIDTH - 1, 20).is_err());
        assert!(Field::new(40, MIN_HEIGHT - 1).is_err());
        assert!(Field::new(MIN_WIDTH, MIN_HEIGHT).is_ok());
    }

    #[test]
    fn border_is_not_part_of_the_field() {
        let field = Field::new(20, 10).unwrap();

        assert!(field.contains((1, 1)));
        assert!(field.contains((8, 18)));
        assert!(!field.contains((0, 5)));
        assert!(!field.contains((5, 0)));
        assert!(!field.contains((9, 5)));
        assert!(!field.contains((5, 19)));
        assert!(!field.contains((-1, 5)));
    }

    #[test]
    fn cells_cover_the_interior() {
        let field = Field::new(14, 7).unwrap();
        let cells: Vec<Coords> = field.cells().collect();

        assert_eq!(cells.len(), field.cell_count());
        assert_eq!(cells.len(), 12 * 5);
        assert!(cells.iter().all(|pos| field.contains(*pos)));
    }

    #[test]
    fn random_cells_stay_inside() {
        let field = Field::new(12, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let (row, col) = field.random_cell(&mut rng);
            assert!(row >= 1 && row <= field.height() - 1);
            assert!(col >= 1 && col <= field.width() - 1);
            assert!(field.contains((row, col)));
        }
    }
}
