pub mod dice;
pub mod enumerator;
pub mod grid;
pub mod lexicon;
pub mod locator;
pub mod round;
pub mod util;

// 4x4 grid, 16 cells
pub const DIMENSION: usize = 4;

/// A path visits each cell at most once
pub const MAX_WORD_LEN: usize = DIMENSION * DIMENSION;

pub use self::enumerator::{find_all, par_find_all, PrefixIndex};
pub use self::grid::{GridError, LetterGrid};
pub use self::lexicon::{Difficulty, Learned, Lexicon, LexiconError, LoadOutcome};
pub use self::locator::{is_on_board, trace};
pub use self::round::{LearnReport, RoundWords};
pub use self::util::Position;
