use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use kanji_stroke::app::{App, open_progress};
use kanji_stroke::kanji::source::{PUZZLE_FILE, read_json};
use kanji_stroke::kanji::validate::validate_puzzles;
use kanji_stroke::kanji::{MAX_GRADE, MIN_GRADE, PuzzleRecord};
use kanji_stroke::progress::badges::ALL_KANJI;
use kanji_stroke::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kanji-stroke")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, points, statistics and badges
    Stats,
    /// Check the radical puzzle data for consistency
    CheckPuzzles {
        /// Path to the puzzle JSON (defaults to the configured data directory)
        path: Option<PathBuf>,
    },
    /// Erase all saved progress
    ResetProgress,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never tear the TUI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kanji_stroke=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Stats) => print_stats(&config)?,
        Some(Commands::CheckPuzzles { path }) => {
            let path = match path {
                Some(path) => path,
                None => config.kanji_data_dir()?.join(PUZZLE_FILE),
            };
            check_puzzles(&path)?;
        }
        Some(Commands::ResetProgress) => {
            let mut progress = open_progress(&config)?;
            progress.reset();
            println!("Progress reset.");
        }
        None => {
            let mut app = App::new(config)?;
            app.run().await?;
        }
    }

    Ok(())
}

fn print_stats(config: &Config) -> Result<()> {
    let progress = open_progress(config)?;
    let level = progress.level_progress();
    match level.next {
        Some(next) => println!("Lv.{}  {} / {} ALT", level.level, level.current, next),
        None => println!("Lv.{}  {} ALT (max)", level.level, level.current),
    }

    let scores = progress.scores();
    let stats = &scores.stats;
    println!("Studied  {}/{}", progress.studied_count(), ALL_KANJI);
    for grade in MIN_GRADE..=MAX_GRADE {
        println!("  Grade {}  {}", grade, progress.studied_in_grade(grade));
    }
    println!("Quiz     {}/{}", stats.quiz_correct, stats.quiz_total);
    println!("Puzzle   {}/{}", stats.puzzle_correct, stats.puzzle_total);
    println!("Combo    {}", stats.max_combo);
    println!("Weak     {}", scores.weak_kanji.len());

    let badges = progress.badges();
    println!("Badges   {}/{}", badges.unlocked_count(), badges.all().len());
    for status in badges.all().into_iter().filter(|s| s.unlocked_at.is_some()) {
        println!("  {} {}", status.badge.icon, status.badge.name);
    }
    Ok(())
}

fn check_puzzles(path: &Path) -> Result<()> {
    let records: Vec<PuzzleRecord> = read_json(path)?;
    let report = validate_puzzles(&records);

    println!("{} puzzles in {}", report.total, path.display());
    for (grade, count) in &report.per_grade {
        println!("  Grade {}: {}", grade, count);
    }
    for (difficulty, count) in &report.per_difficulty {
        println!("  Difficulty {}: {}", difficulty, count);
    }

    if !report.is_valid() {
        for issue in &report.issues {
            eprintln!("  {}", issue);
        }
        bail!("{} problems found", report.issues.len());
    }
    println!("OK");
    Ok(())
}
