use super::DIMENSION;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Iterates every cell of the grid in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..DIMENSION).flat_map(|row| (0..DIMENSION).map(move |col| Position { row, col }))
    }

    /// The 3x3 block centred on this position, row-major, centre included.
    /// Positions off the top/left edge wrap to huge indices, so they are simply
    /// out of range for any grid accessor.
    pub fn neighbourhood(&self) -> impl Iterator<Item = Position> {
        let origin = *self;
        (-1isize..=1).flat_map(move |dr| {
            (-1isize..=1).map(move |dc| Position {
                row: origin.row.wrapping_add_signed(dr),
                col: origin.col.wrapping_add_signed(dc),
            })
        })
    }

    /// True if both cells differ by at most one in each axis and are not the same cell
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    pub fn in_bounds(&self) -> bool {
        self.row < DIMENSION && self.col < DIMENSION
    }

    /// Converts the row/col to a 1d index
    pub fn as_index(&self) -> usize {
        self.row * DIMENSION + self.col
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbourhood_corner() {
        let cells = Position::new(0, 0)
            .neighbourhood()
            .filter(Position::in_bounds)
            .collect::<Vec<_>>();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_neighbourhood_centre_is_row_major() {
        let cells = Position::new(1, 1).neighbourhood().collect::<Vec<_>>();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[4], Position::new(1, 1));
        assert_eq!(cells[8], Position::new(2, 2));
    }

    #[test]
    fn test_adjacency() {
        let p = Position::new(1, 1);
        assert!(p.is_adjacent(&Position::new(0, 0)));
        assert!(p.is_adjacent(&Position::new(2, 1)));
        assert!(!p.is_adjacent(&p));
        assert!(!p.is_adjacent(&Position::new(3, 1)));
    }

    #[test]
    fn test_all_covers_grid() {
        let cells = Position::all().collect::<Vec<_>>();
        assert_eq!(cells.len(), DIMENSION * DIMENSION);
        assert!(cells.iter().enumerate().all(|(i, p)| p.as_index() == i));
    }
}
