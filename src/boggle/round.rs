use std::collections::HashSet;

use log::{info, warn};
use rand::Rng;

use super::grid::LetterGrid;
use super::lexicon::{Difficulty, Lexicon, LexiconError};
use super::locator;

/// Shorter words are never offered to the lexicon
const MIN_LEARN_LEN: usize = 3;

/// What `RoundWords::learn_new_words` did
#[derive(Debug, Default)]
pub struct LearnReport {
    pub added: usize,
    pub save_error: Option<LexiconError>,
}

/// Partition of one round's words between the human and computer players.
/// Recomputed from scratch each round, never updated incrementally except by `reject`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundWords {
    /// Valid words found by both players
    pub common: HashSet<String>,
    /// Human words that cannot be traced on the board
    pub invalid: HashSet<String>,
    /// Valid words found only by the human
    pub human_only: HashSet<String>,
    /// Words found only by the computer
    pub computer_only: HashSet<String>,
}

impl RoundWords {
    pub fn classify<I, J, S, T>(grid: &mut LetterGrid, human: I, computer: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let computer = computer
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect::<HashSet<_>>();

        let mut round = Self::default();
        for word in human.into_iter() {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if !locator::is_on_board(grid, word.as_str()) {
                round.invalid.insert(word);
            } else if computer.contains(&word) {
                round.common.insert(word);
            } else {
                round.human_only.insert(word);
            }
        }
        round.computer_only = computer.difference(&round.common).cloned().collect();
        round
    }

    /// Offers each word only the human found to the lexicon. Every candidate is
    /// offered even when saving fails; the first save error is kept in the report.
    pub fn learn_new_words<R: Rng + ?Sized>(
        &self,
        lexicon: &mut Lexicon,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> LearnReport {
        // Sorted so a seeded generator gives the same outcome every run
        let mut candidates = self
            .human_only
            .iter()
            .filter(|w| w.chars().count() >= MIN_LEARN_LEN)
            .collect::<Vec<_>>();
        candidates.sort_unstable();

        let mut report = LearnReport::default();
        for word in candidates {
            let before = lexicon.len();
            if let Err(e) = lexicon.learn(word, difficulty, rng) {
                warn!("Could not save after learning {:?}: {}", word, e);
                report.save_error.get_or_insert(e);
            }
            // A failed save still leaves the word learned
            if lexicon.len() > before {
                report.added += 1;
            }
        }
        info!(
            "Learned {} new words at difficulty {}",
            report.added, difficulty
        );
        report
    }

    /// Disallows words: they leave the lexicon and every word set
    pub fn reject<I, S>(&mut self, lexicon: &mut Lexicon, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            lexicon.forget(&word);
            self.common.remove(&word);
            self.invalid.remove(&word);
            self.human_only.remove(&word);
            self.computer_only.remove(&word);
        }
    }
}
