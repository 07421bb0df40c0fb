use ndarray_rand::rand_distr::{Distribution, WeightedIndex};
use rand::Rng;

/// Letter frequencies of a physical Boggle set, out of 96 die faces
#[derive(Debug, Clone)]
pub struct LetterDistribution {
    alph: [char; 26],
    amts: [u32; 26],
    dist: WeightedIndex<u32>,
}

impl LetterDistribution {
    pub fn boggle() -> Self {
        let alph = [
            'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q',
            'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
        ];
        let amts = [
            6, 2, 2, 3, 10, 2, 2, 5, 6, 1, 1, 5, 2, 6, 6, 2, 1, 5, 6, 10, 3, 2, 3, 3, 1, 1,
        ];
        // Weights are fixed and all positive so this cannot fail
        let dist = match WeightedIndex::new(amts) {
            Ok(dist) => dist,
            Err(e) => unreachable!("boggle letter weights are valid: {}", e),
        };
        Self { alph, amts, dist }
    }

    /// Number of faces carrying this letter, 0 for anything outside a-z
    pub fn weight(&self, letter: char) -> u32 {
        self.alph
            .iter()
            .position(|&c| c == letter.to_ascii_lowercase())
            .map_or(0, |i| self.amts[i])
    }

    pub fn total_weight(&self) -> u32 {
        self.amts.iter().sum()
    }
}

impl Default for LetterDistribution {
    fn default() -> Self {
        Self::boggle()
    }
}

impl Distribution<char> for LetterDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.alph[self.dist.sample(rng)]
    }
}
