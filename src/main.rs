use clap::Parser;
use tracing_subscriber::EnvFilter;

use scachera::{Position, SearchConfig, Searcher};

/// Prints a position and the engine's ranked replies.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Position to analyse, the standard start position when omitted
    #[arg(long)]
    fen: Option<String>,

    /// Search depth (0-3)
    #[arg(long, default_value_t = 1)]
    level: i64,

    /// Seed for tie-breaking
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1)]
    threads: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let pos = match &args.fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::new(),
    };

    print!("{pos}");
    println!("{}", pos.to_fen());

    if pos.is_checkmate() {
        println!("Checkmate, {} lost", pos.turn());
        return Ok(());
    }
    if pos.is_finished() {
        println!("Stalemate");
        return Ok(());
    }

    let config = SearchConfig { threads: args.threads, seed: args.seed, ..Default::default() };
    let mut searcher = Searcher::new(config);
    for scored in searcher.rank_moves(&pos, args.level)? {
        println!("{} {} {}", scored.from, scored.to, scored.score);
    }
    Ok(())
}
