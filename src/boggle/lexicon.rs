use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Net number of newly learned words that triggers an automatic save
pub const SAVE_THRESHOLD: usize = 20;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("could not save lexicon to {}: {source}", .path.display())]
    Save { path: PathBuf, source: io::Error },
    #[error("could not index lexicon: {0}")]
    Index(#[from] fst::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("difficulty must be between {} and {}, got {0}", Difficulty::MIN, Difficulty::MAX)]
pub struct DifficultyError(pub u8);

/// How eagerly the lexicon learns new words: at level `d` a new word is admitted
/// with probability `d / 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self, DifficultyError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DifficultyError(level))
        }
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn probability(&self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Admission check against a uniform sample from [0, 1)
    pub fn admits(&self, sample: f64) -> bool {
        sample < self.probability()
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DifficultyError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the lexicon has grown enough since its last save to be saved again
pub fn save_due(len: usize, len_at_save: usize, threshold: usize) -> bool {
    len.saturating_sub(len_at_save) >= threshold
}

/// Result of reading a word source. A failed load still leaves a usable, empty lexicon.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed(io::Error),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// What a call to `learn` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Learned {
    pub added: bool,
    pub saved: bool,
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

/// Sorted, duplicate free, lower case word list.
///
/// Membership and prefix queries are binary searches over the sorted list. Words are
/// only ever added by bulk loading or `learn`, and removed by `forget`.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: Vec<String>,
    /// Where `save` writes to. In-memory lexicons have none.
    store: Option<PathBuf>,
    /// Size of the list when it was last loaded or saved
    len_at_save: usize,
    save_threshold: usize,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            store: None,
            len_at_save: 0,
            save_threshold: SAVE_THRESHOLD,
        }
    }
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a lexicon from any word source. Words are trimmed and lower cased;
    /// blanks and duplicates are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>();
        words.sort_unstable();
        words.dedup();
        Self {
            len_at_save: words.len(),
            words,
            ..Self::new()
        }
    }

    /// Reads one word per line. Lines that are not valid UTF-8 are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = Vec::new();
        for (i, line) in reader.split(b'\n').enumerate() {
            match String::from_utf8(line?) {
                Ok(word) => words.push(word),
                Err(e) => warn!("Skipping line {}, not valid UTF-8: {}", i + 1, e),
            }
        }
        Ok(Self::from_words(words))
    }

    /// Loads the word file at `path`, which also becomes the save target.
    /// A read failure yields an empty lexicon and is reported in the outcome. Only a
    /// missing file keeps `path` as the save target; any other failure leaves the
    /// lexicon in memory so the unread file is never overwritten.
    pub fn load<P: AsRef<Path>>(path: P) -> (Self, LoadOutcome) {
        let path = path.as_ref();
        let read = File::open(path).and_then(|file| Self::from_reader(BufReader::new(file)));
        match read {
            Ok(lexicon) => {
                info!("Loaded {} words from {}", lexicon.len(), path.display());
                let n = lexicon.len();
                (lexicon.with_store(path), LoadOutcome::Loaded(n))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} not found, starting empty: {}", path.display(), e);
                (Self::new().with_store(path), LoadOutcome::Failed(e))
            }
            Err(e) => {
                warn!(
                    "Could not read {}, starting empty without saving: {}",
                    path.display(),
                    e
                );
                (Self::new(), LoadOutcome::Failed(e))
            }
        }
    }

    pub fn with_save_threshold(mut self, threshold: usize) -> Self {
        self.save_threshold = threshold;
        self
    }

    pub fn with_store<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.store = Some(path.into());
        self
    }

    pub fn store(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    fn position(&self, word: &str) -> Result<usize, usize> {
        self.words.binary_search_by(|w| w.as_str().cmp(word))
    }

    /// Membership test. `None` and the empty word are never members.
    pub fn contains<'w>(&self, word: impl Into<Option<&'w str>>) -> bool {
        match word.into().map(normalize) {
            Some(word) if !word.is_empty() => self.position(&word).is_ok(),
            _ => false,
        }
    }

    /// True if some entry starts with `prefix`
    pub fn has_prefix<'w>(&self, prefix: impl Into<Option<&'w str>>) -> bool {
        let Some(prefix) = prefix.into().map(normalize) else {
            return false;
        };
        // First entry not ordered before the prefix is the only candidate
        let idx = self.words.partition_point(|w| w.as_str() < prefix.as_str());
        self.words
            .get(idx)
            .map_or(false, |w| w.starts_with(prefix.as_str()))
    }

    /// Admits `word` with probability `difficulty / 10` if it is new, then saves
    /// once enough words have been learned since the last save.
    pub fn learn<R: Rng + ?Sized>(
        &mut self,
        word: &str,
        difficulty: Difficulty,
        rng: &mut R,
    ) -> Result<Learned, LexiconError> {
        let word = normalize(word);
        let mut learned = Learned::default();
        if word.is_empty() {
            return Ok(learned);
        }

        if difficulty.admits(rng.gen::<f64>()) {
            if let Err(idx) = self.position(&word) {
                debug!("Learned {:?}", word);
                self.words.insert(idx, word);
                learned.added = true;
            }
        }

        if self.store.is_some() && save_due(self.len(), self.len_at_save, self.save_threshold) {
            self.save()?;
            learned.saved = true;
        }
        Ok(learned)
    }

    /// Removes the word if present. Returns whether anything was removed.
    pub fn forget(&mut self, word: &str) -> bool {
        let word = normalize(word);
        match self.position(&word) {
            Ok(idx) => {
                debug!("Forgot {:?}", word);
                self.words.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Writes every word to the save target. Does nothing for in-memory lexicons.
    pub fn save(&mut self) -> Result<(), LexiconError> {
        let Some(path) = self.store.clone() else {
            debug!("No save target, skipping save");
            return Ok(());
        };
        self.save_to(&path)?;
        self.len_at_save = self.words.len();
        Ok(())
    }

    /// Writes every word, one per line, to `path`
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), LexiconError> {
        let path = path.as_ref();
        let save_err = |source| LexiconError::Save {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(save_err)?;
        let mut writer = BufWriter::new(file);
        for word in &self.words {
            writeln!(writer, "{}", word).map_err(save_err)?;
        }
        writer.flush().map_err(save_err)?;
        info!("Saved {} words to {}", self.words.len(), path.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}
