use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{error, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[macro_use]
extern crate text_io;

use boggle::boggle::{
    find_all, par_find_all, Difficulty, LetterGrid, Lexicon, LoadOutcome, PrefixIndex, RoundWords,
};
use boggle::config::GameConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Test every lexicon word against the board
    Scan,
    /// Same as scan, spread over all cores
    Parallel,
    /// Walk the board and a prefix index together
    Index,
}

/// Play Boggle rounds against a computer that learns from your words
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Word list, one word per line
    #[arg(short, long)]
    lexicon: Option<PathBuf>,
    /// How eagerly the computer learns your words, 1 to 10
    #[arg(short, long)]
    difficulty: Option<u8>,
    /// Seed for mixing the grid
    #[arg(short, long)]
    seed: Option<u64>,
    /// Play a fixed grid from a JSON file instead of mixing
    #[arg(short, long)]
    grid: Option<PathBuf>,
    /// How the computer searches for words
    #[arg(long, value_enum, default_value_t = Strategy::Index)]
    strategy: Strategy,
    /// Write the effective config to this file and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn read_line() -> Option<String> {
    let line: Result<String, text_io::Error> = try_read!("{}\n");
    line.ok()
}

/// Reads lines until a blank line or end of input
fn read_words() -> Vec<String> {
    let mut words = Vec::new();
    while let Some(line) = read_line() {
        let word = line.trim();
        if word.is_empty() {
            break;
        }
        words.push(word.to_string());
    }
    words
}

fn display_words(title: &str, words: &HashSet<String>) {
    let mut sorted = words.iter().map(String::as_str).collect::<Vec<_>>();
    sorted.sort_unstable();
    println!("{} ({}): {}", title, sorted.len(), sorted.join(" "));
}

fn display_round(round: &RoundWords) {
    display_words("Found by both", &round.common);
    display_words("Found only by you", &round.human_only);
    display_words("Found only by the computer", &round.computer_only);
    display_words("Not on the board", &round.invalid);
}

fn computer_words(
    strategy: Strategy,
    grid: &mut LetterGrid,
    lexicon: &Lexicon,
) -> Result<HashSet<String>, Box<dyn Error>> {
    let words = match strategy {
        Strategy::Scan => find_all(grid, lexicon),
        Strategy::Parallel => par_find_all(grid, lexicon),
        // The lexicon changes between rounds, so the index is rebuilt each time
        Strategy::Index => PrefixIndex::build(lexicon)?.find_all(grid),
    };
    Ok(words)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(path) = cli.lexicon {
        config.lexicon_path = path;
    }
    if let Some(level) = cli.difficulty {
        config.difficulty = Difficulty::new(level)?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(path) = &cli.write_config {
        config.save_to_file(path)?;
        println!("Wrote config to {}", path.display());
        return Ok(());
    }

    let fixed_grid = cli.grid.as_ref().map(LetterGrid::from_file).transpose()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (lexicon, outcome) = Lexicon::load(&config.lexicon_path);
    let mut lexicon = lexicon.with_save_threshold(config.save_threshold);
    match outcome {
        LoadOutcome::Loaded(n) => println!("Loaded {} words.", n),
        LoadOutcome::Failed(e) => {
            warn!("Lexicon load failed: {}", e);
            println!(
                "Could not read {}; the computer starts with no words.",
                config.lexicon_path.display()
            );
        }
    }

    let mut round_number = 0;
    loop {
        round_number += 1;
        let mut grid = match &fixed_grid {
            Some(grid) => grid.clone(),
            None => {
                let mut grid = LetterGrid::new();
                grid.mix(&mut rng);
                grid
            }
        };

        println!("\n============ Round {} ============", round_number);
        print!("{}", grid);
        println!("Enter your words, one per line, then a blank line:");
        let human = read_words();

        let computer = computer_words(cli.strategy, &mut grid, &lexicon)?;
        let mut round = RoundWords::classify(&mut grid, &human, &computer);
        display_round(&round);

        let report = round.learn_new_words(&mut lexicon, config.difficulty, &mut rng);
        if report.added > 0 {
            println!("The computer learned {} new word(s).", report.added);
        }
        if let Some(e) = report.save_error {
            println!("Warning: the word list was not saved: {}", e);
        }

        println!("Enter any words to reject, one per line, then a blank line:");
        let rejected = read_words();
        round.reject(&mut lexicon, &rejected);

        println!("Press enter for another round, or type 'quit':");
        match read_line() {
            Some(line) if !line.trim().eq_ignore_ascii_case("quit") => continue,
            _ => break,
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
