use clap::Parser;
use minegrid_core::{Coord, DEFAULT_MINE_RATIO, MAX_SIZE, MIN_SIZE, Session};
use std::io;

mod board;
mod command;
mod game;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Grid dimension, asked for interactively when missing
    #[arg(value_parser = clap::value_parser!(Coord).range(i64::from(MIN_SIZE)..=i64::from(MAX_SIZE)))]
    size: Option<Coord>,

    /// Fraction of cells holding a mine
    #[arg(short, long, default_value_t = DEFAULT_MINE_RATIO)]
    mine_ratio: f64,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

/// Seed from the wall clock, good enough to vary games between runs.
fn clock_seed() -> u64 {
    use web_time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            elapsed.as_secs().rotate_left(32) ^ u64::from(elapsed.subsec_nanos())
        })
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    let size = match args.size {
        Some(size) => size,
        None => match game::read_size(&mut input, &mut out)? {
            Some(size) => size,
            None => return Ok(()),
        },
    };

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);

    let mut session = Session::new(size, args.mine_ratio, seed)?;
    let ending = game::play(&mut session, &mut input, &mut out)?;
    log::info!("game ended: {:?}", ending);

    Ok(())
}
