use std::ops::{Deref, DerefMut};

use super::grid::LetterGrid;
use super::util::Position;
use super::MAX_WORD_LEN;

/*
    Backtracking search for a single word on the grid. The grid's in-use mask is the
    working state: a cell on the current path is leased, and the lease is released when
    it goes out of scope, on every exit path. Two searches must never share one grid
    at the same time.
*/

/// Holds one grid cell in use for as long as it lives
pub(crate) struct CellLease<'g> {
    grid: &'g mut LetterGrid,
    pos: Position,
}

impl<'g> CellLease<'g> {
    /// Marks the cell in use. Fails if the cell is out of range or already leased.
    pub(crate) fn acquire(grid: &'g mut LetterGrid, pos: Position) -> Option<(char, Self)> {
        let letter = grid.use_char_at(pos.row, pos.col)?;
        Some((letter, Self { grid, pos }))
    }
}

impl Deref for CellLease<'_> {
    type Target = LetterGrid;

    fn deref(&self) -> &Self::Target {
        self.grid
    }
}

impl DerefMut for CellLease<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.grid
    }
}

impl Drop for CellLease<'_> {
    fn drop(&mut self) {
        self.grid.un_use_char_at(self.pos.row, self.pos.col);
    }
}

/// Checks whether a word can be traced through adjacent, distinct cells.
/// `None` is never on the board; the empty word always is.
pub fn is_on_board<'w>(grid: &mut LetterGrid, word: impl Into<Option<&'w str>>) -> bool {
    match word.into() {
        None => false,
        Some("") => true,
        Some(word) => trace(grid, word).is_some(),
    }
}

/// Finds a path spelling `word`, returning its cells in word order.
/// The grid's in-use mask is clear again when this returns.
pub fn trace(grid: &mut LetterGrid, word: &str) -> Option<Vec<Position>> {
    let word = word.to_lowercase().chars().collect::<Vec<_>>();
    if word.len() > MAX_WORD_LEN {
        return None;
    }
    if word.is_empty() {
        return Some(Vec::new());
    }

    // Stale marks from an interrupted search must not hide cells
    grid.un_use_all();

    let mut path = Vec::with_capacity(word.len());
    for start in Position::all() {
        if extend(grid, start, &word, &mut path) {
            return Some(path);
        }
    }
    None
}

/// Tries to match `rest` starting at `pos`. On success the matched cells are on `path`;
/// on failure `path` is left as it was.
fn extend(grid: &mut LetterGrid, pos: Position, rest: &[char], path: &mut Vec<Position>) -> bool {
    if grid.char_at(pos.row, pos.col) != Some(rest[0]) {
        return false;
    }
    if rest.len() == 1 {
        path.push(pos);
        return true;
    }

    let Some((_, mut lease)) = CellLease::acquire(grid, pos) else {
        return false;
    };
    path.push(pos);
    // The centre cell is leased, so probing it simply fails
    for next in pos.neighbourhood() {
        if extend(&mut lease, next, &rest[1..], path) {
            return true;
        }
    }
    path.pop();
    false
}
