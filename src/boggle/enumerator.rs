use std::collections::HashSet;

use fst::raw::Node;
use fst::Set;
use log::debug;
use rayon::prelude::*;

use super::grid::LetterGrid;
use super::lexicon::{Lexicon, LexiconError};
use super::locator::{self, CellLease};
use super::util::Position;

/// Every lexicon word that can be traced on the grid. This is the computer
/// player's move for a round.
pub fn find_all(grid: &mut LetterGrid, lexicon: &Lexicon) -> HashSet<String> {
    let found = lexicon
        .iter()
        .filter(|word| locator::is_on_board(grid, *word))
        .map(str::to_string)
        .collect::<HashSet<_>>();
    debug!("Found {} of {} lexicon words", found.len(), lexicon.len());
    found
}

/// Same result as `find_all`, with the lexicon split across the rayon pool.
/// Each worker searches its own copy of the grid.
pub fn par_find_all(grid: &LetterGrid, lexicon: &Lexicon) -> HashSet<String> {
    lexicon
        .words()
        .par_iter()
        .map_init(
            || grid.clone(),
            |grid, word| locator::is_on_board(grid, word.as_str()).then(|| word.clone()),
        )
        .flatten()
        .collect()
}

/// Snapshot of a lexicon as a finite state transducer. Walking the grid and the
/// automaton together abandons a path as soon as no word starts with its letters.
///
/// The snapshot does not follow later `learn`/`forget` calls; rebuild it instead.
pub struct PrefixIndex {
    set: Set<Vec<u8>>,
}

impl PrefixIndex {
    pub fn build(lexicon: &Lexicon) -> Result<Self, LexiconError> {
        // Lexicon entries are sorted and unique, which is exactly what the builder needs
        let set = Set::from_iter(lexicon.iter())?;
        Ok(Self { set })
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word)
    }

    /// Every indexed word that can be traced on the grid
    pub fn find_all(&self, grid: &mut LetterGrid) -> HashSet<String> {
        grid.un_use_all();
        let mut found = HashSet::new();
        let mut prefix = Vec::new();
        let root = self.set.as_fst().root();
        for start in Position::all() {
            self.walk(grid, start, root.clone(), &mut prefix, &mut found);
        }
        debug!("Prefix walk found {} of {} words", found.len(), self.len());
        found
    }

    fn walk<'f>(
        &'f self,
        grid: &mut LetterGrid,
        pos: Position,
        mut node: Node<'f>,
        prefix: &mut Vec<u8>,
        found: &mut HashSet<String>,
    ) {
        let Some((letter, mut lease)) = CellLease::acquire(grid, pos) else {
            return;
        };

        // Follow the letter's UTF-8 bytes through the automaton
        let mut buf = [0u8; 4];
        let bytes = letter.encode_utf8(&mut buf).as_bytes();
        let fst = self.set.as_fst();
        for &b in bytes {
            match node.find_input(b) {
                Some(i) => node = fst.node(node.transition_addr(i)),
                None => return,
            }
        }

        let mark = prefix.len();
        prefix.extend_from_slice(bytes);
        if node.is_final() {
            if let Ok(word) = std::str::from_utf8(prefix) {
                found.insert(word.to_string());
            }
        }
        if node.len() > 0 {
            for next in pos.neighbourhood() {
                self.walk(&mut lease, next, node.clone(), prefix, found);
            }
        }
        prefix.truncate(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn cats_grid() -> LetterGrid {
        LetterGrid::from_rows([
            ["C", "A", "T", "S"],
            ["O", "R", "E", "D"],
            ["D", "O", "G", "X"],
            ["X", "X", "X", "X"],
        ])
        .unwrap()
    }

    fn expected(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_find_all_known_grid() {
        let mut grid = cats_grid();
        let lexicon = Lexicon::from_words(["CAT", "DOG", "ZEBRA"]);
        assert_eq!(find_all(&mut grid, &lexicon), expected(&["cat", "dog"]));
        assert!(!grid.any_in_use());
    }

    #[test]
    fn test_find_all_empty_lexicon() {
        let mut grid = cats_grid();
        assert!(find_all(&mut grid, &Lexicon::new()).is_empty());
        assert!(par_find_all(&grid, &Lexicon::new()).is_empty());
        let index = PrefixIndex::build(&Lexicon::new()).unwrap();
        assert!(index.is_empty());
        assert!(index.find_all(&mut grid).is_empty());
    }

    #[test]
    fn test_prefix_index_known_grid() {
        let mut grid = cats_grid();
        let lexicon = Lexicon::from_words(["cat", "cats", "ca", "dog", "doge", "star", "toga"]);
        let index = PrefixIndex::build(&lexicon).unwrap();
        assert_eq!(index.len(), 7);
        assert!(index.contains("doge"));
        assert_eq!(
            index.find_all(&mut grid),
            expected(&["ca", "cat", "cats", "dog", "doge", "star"])
        );
        assert!(!grid.any_in_use());
    }

    #[test]
    fn test_strategies_agree_on_random_grids() {
        let mut rng = StdRng::seed_from_u64(11);
        let alphabet = b"aeinorst";
        let words = (0..400)
            .map(|_| {
                let len = rng.gen_range(1..=6);
                (0..len)
                    .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        let lexicon = Lexicon::from_words(&words);
        let index = PrefixIndex::build(&lexicon).unwrap();

        for _ in 0..20 {
            let mut grid = LetterGrid::new();
            grid.mix(&mut rng);
            let plain = find_all(&mut grid, &lexicon);
            assert_eq!(par_find_all(&grid, &lexicon), plain);
            assert_eq!(index.find_all(&mut grid), plain);
            assert!(plain.iter().all(|w| lexicon.contains(w.as_str())));
            assert!(!grid.any_in_use());
        }
    }
}
