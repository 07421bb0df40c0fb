use std::fmt;
use std::path::Path;

use ndarray::Array2;
use ndarray_rand::RandomExt;
use rand::Rng;
use thiserror::Error;

use super::dice::LetterDistribution;
use super::util::Position;
use super::DIMENSION;
use crate::utils::serialization::{self, JsonError};

/// Placeholder held by cells that were never filled. No word character read from
/// a lexicon or typed by a player can equal it.
pub const EMPTY_CELL: char = '\0';

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid must have {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} must have {expected} cells, found {found}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {col}) must hold exactly one letter, found {cell:?}")]
    BadCell { row: usize, col: usize, cell: String },
    #[error(transparent)]
    Json(#[from] JsonError),
}

/// The 4x4 letter grid together with the mask of cells committed to an
/// in-progress search path.
///
/// Asking for a cell that is out of range or in use yields `None`, which lets a
/// search probe every neighbour uniformly without special-casing the edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterGrid {
    /// Letters on the board, always lower case
    letters: Array2<char>,
    /// True while the cell is on the current search path
    in_use: Array2<bool>,
}

impl LetterGrid {
    pub fn new() -> Self {
        Self {
            letters: Array2::from_elem((DIMENSION, DIMENSION), EMPTY_CELL),
            in_use: Array2::from_elem((DIMENSION, DIMENSION), false),
        }
    }

    /// Builds a grid from explicit rows, one letter per cell. Nothing is built
    /// unless every row and cell is well formed.
    pub fn from_rows<I, R, S>(rows: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|cells| cells.into_iter().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        if rows.len() != DIMENSION {
            return Err(GridError::RowCount {
                expected: DIMENSION,
                found: rows.len(),
            });
        }

        let mut grid = Self::new();
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != DIMENSION {
                return Err(GridError::RowLength {
                    row,
                    expected: DIMENSION,
                    found: cells.len(),
                });
            }
            for (col, cell) in cells.iter().enumerate() {
                let cell = cell.as_ref();
                // Must still be a single character once lower-cased
                let lower = cell.to_lowercase();
                let mut chars = lower.chars();
                let letter = match (cell.chars().count(), chars.next(), chars.next()) {
                    (1, Some(c), None) if c != EMPTY_CELL => c,
                    _ => {
                        return Err(GridError::BadCell {
                            row,
                            col,
                            cell: cell.to_string(),
                        })
                    }
                };
                grid.letters[[row, col]] = letter;
            }
        }
        Ok(grid)
    }

    /// Loads a fixed grid from a JSON file holding an array of rows, e.g.
    /// `[["c","a","t","s"], ...]`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let raw: Vec<Vec<String>> = serialization::load_json(path)?;
        Self::from_rows(raw)
    }

    /// Rolls every cell from the Boggle letter distribution and clears the in-use mask
    pub fn mix<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.letters =
            Array2::random_using((DIMENSION, DIMENSION), LetterDistribution::boggle(), rng);
        self.un_use_all();
    }

    /// Letter at a cell if it is in range and not in use. Does not touch the mask.
    pub fn char_at(&self, row: usize, col: usize) -> Option<char> {
        match self.in_use.get((row, col)) {
            Some(false) => self.letters.get((row, col)).copied(),
            _ => None,
        }
    }

    /// Same as `char_at`, but a successful read also marks the cell in use
    pub fn use_char_at(&mut self, row: usize, col: usize) -> Option<char> {
        let letter = self.char_at(row, col)?;
        self.in_use[[row, col]] = true;
        Some(letter)
    }

    /// Releases one cell. Out of range coordinates are ignored.
    pub fn un_use_char_at(&mut self, row: usize, col: usize) {
        if let Some(flag) = self.in_use.get_mut((row, col)) {
            *flag = false;
        }
    }

    pub fn un_use_all(&mut self) {
        self.in_use.fill(false);
    }

    /// Whether a cell is marked in use; out of range cells never are
    pub fn is_in_use(&self, row: usize, col: usize) -> bool {
        self.in_use.get((row, col)).copied().unwrap_or(false)
    }

    pub fn any_in_use(&self) -> bool {
        self.in_use.iter().any(|&flag| flag)
    }

    /// Letter at a position regardless of the mask
    pub fn letter(&self, pos: Position) -> Option<char> {
        self.letters.get((pos.row, pos.col)).copied()
    }

    /// Each row of letters as a string
    pub fn rows(&self) -> Vec<String> {
        self.letters
            .rows()
            .into_iter()
            .map(|row| row.iter().collect())
            .collect()
    }
}

impl Default for LetterGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LetterGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.letters.rows() {
            for (i, &c) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                let shown = if c == EMPTY_CELL { '-' } else { c.to_ascii_uppercase() };
                write!(f, "{}", shown)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cats_grid() -> LetterGrid {
        LetterGrid::from_rows([
            ["C", "A", "T", "S"],
            ["O", "R", "E", "D"],
            ["D", "O", "G", "X"],
            ["X", "X", "X", "X"],
        ])
        .unwrap()
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = LetterGrid::new();
        assert_eq!(grid.char_at(0, 0), Some(EMPTY_CELL));
        assert!(!grid.any_in_use());
    }

    #[test]
    fn test_from_rows_lowercases() {
        let grid = cats_grid();
        assert_eq!(grid.char_at(0, 0), Some('c'));
        assert_eq!(grid.rows()[1], "ored");
    }

    #[test]
    fn test_from_rows_rejects_bad_dimensions() {
        let short = LetterGrid::from_rows([["a", "b", "c", "d"]; 3]);
        assert!(matches!(short, Err(GridError::RowCount { found: 3, .. })));

        let narrow = LetterGrid::from_rows([
            vec!["a", "b", "c", "d"],
            vec!["a", "b", "c"],
            vec!["a", "b", "c", "d"],
            vec!["a", "b", "c", "d"],
        ]);
        assert!(matches!(
            narrow,
            Err(GridError::RowLength { row: 1, found: 3, .. })
        ));

        let wide = LetterGrid::from_rows([["ab", "c", "d", "e"]; 4]);
        assert!(matches!(wide, Err(GridError::BadCell { row: 0, col: 0, .. })));
    }

    #[test]
    fn test_from_rows_rejects_letters_that_lowercase_to_several() {
        // 'İ' lower-cases to "i̇", two characters
        let dotted = LetterGrid::from_rows([
            ["a", "b", "c", "d"],
            ["a", "b", "İ", "d"],
            ["a", "b", "c", "d"],
            ["a", "b", "c", "d"],
        ]);
        assert!(matches!(dotted, Err(GridError::BadCell { row: 1, col: 2, .. })));

        let accented = LetterGrid::from_rows([["É", "b", "c", "d"]; 4]).unwrap();
        assert_eq!(accented.char_at(0, 0), Some('é'));
    }

    #[test]
    fn test_char_at_out_of_range() {
        let grid = cats_grid();
        assert_eq!(grid.char_at(4, 0), None);
        assert_eq!(grid.char_at(0, 4), None);
        assert_eq!(grid.char_at(0usize.wrapping_sub(1), 0), None);
    }

    #[test]
    fn test_use_and_release() {
        let mut grid = cats_grid();
        assert_eq!(grid.use_char_at(1, 1), Some('r'));
        assert!(grid.is_in_use(1, 1));
        // In use cells read as unavailable, and cannot be used twice
        assert_eq!(grid.char_at(1, 1), None);
        assert_eq!(grid.use_char_at(1, 1), None);

        grid.un_use_char_at(1, 1);
        assert_eq!(grid.char_at(1, 1), Some('r'));

        // Out of range release is a no-op
        grid.un_use_char_at(9, 9);
        assert_eq!(grid.use_char_at(9, 9), None);
        assert!(!grid.any_in_use());
    }

    #[test]
    fn test_un_use_all() {
        let mut grid = cats_grid();
        for pos in Position::all() {
            grid.use_char_at(pos.row, pos.col);
        }
        assert!(Position::all().all(|p| grid.is_in_use(p.row, p.col)));
        grid.un_use_all();
        assert!(!grid.any_in_use());
    }

    #[test]
    fn test_mix_is_reproducible_and_clears_mask() {
        let mut a = LetterGrid::new();
        let mut b = LetterGrid::new();
        b.use_char_at(2, 2);

        a.mix(&mut StdRng::seed_from_u64(42));
        b.mix(&mut StdRng::seed_from_u64(42));

        assert_eq!(a, b);
        assert!(!b.any_in_use());
        assert!(Position::all().all(|p| a.letter(p).map_or(false, |c| c.is_ascii_lowercase())));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join("boggle_grid_from_file.json");
        std::fs::write(
            &path,
            r#"[["c","a","t","s"],["o","r","e","d"],["d","o","g","x"],["x","x","x","x"]]"#,
        )
        .unwrap();
        let grid = LetterGrid::from_file(&path).unwrap();
        assert_eq!(grid, cats_grid());

        std::fs::write(&path, r#"[["c","a","t","s"]]"#).unwrap();
        assert!(matches!(
            LetterGrid::from_file(&path),
            Err(GridError::RowCount { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_display() {
        let text = cats_grid().to_string();
        assert_eq!(text.lines().next(), Some("C A T S"));
        assert_eq!(text.lines().count(), 4);
    }
}
