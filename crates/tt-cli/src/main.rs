//! CLI frontend for the tabletop tactics engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tt_core::GridPosition;

#[derive(Parser)]
#[command(
    name = "tt",
    about = "Tabletop tactics: dice, initiative, and grid tools",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll dice notation such as 2d6+3
    Roll {
        /// Dice notation (NdS, NdS+M, NdS-M)
        notation: String,

        /// RNG seed for a reproducible roll
        #[arg(short, long)]
        seed: Option<u64>,

        /// Roll a d20 twice and keep the higher
        #[arg(long, conflicts_with = "disadvantage")]
        advantage: bool,

        /// Roll a d20 twice and keep the lower
        #[arg(long)]
        disadvantage: bool,

        /// Why the roll is made
        #[arg(short, long)]
        reason: Option<String>,
    },

    /// Distance between two cells under the 5-10-5 rule
    Distance {
        /// Start cell as X,Y
        from: GridPosition,

        /// End cell as X,Y
        to: GridPosition,
    },

    /// Start an encounter and show the initiative order
    Initiative {
        /// JSON file with an array of player characters
        #[arg(short, long)]
        party: PathBuf,

        /// JSON file with an array of monster groups
        #[arg(short, long)]
        enemies: PathBuf,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Find the cheapest walking path between two cells
    Path {
        /// Map JSON file
        #[arg(short, long)]
        map: PathBuf,

        /// Start cell as X,Y
        #[arg(long)]
        from: GridPosition,

        /// Goal cell as X,Y
        #[arg(long)]
        to: GridPosition,

        /// Movement budget in feet
        #[arg(long)]
        max_cost: Option<u32>,
    },

    /// Check line of sight and cover between two cells
    Los {
        /// Map JSON file
        #[arg(short, long)]
        map: PathBuf,

        /// Observer cell as X,Y
        #[arg(long)]
        from: GridPosition,

        /// Target cell as X,Y
        #[arg(long)]
        to: GridPosition,
    },

    /// Draw a map, with fog of war when viewers are given
    Map {
        /// Map JSON file
        #[arg(short, long)]
        map: PathBuf,

        /// Viewer cell as X,Y (repeatable)
        #[arg(long)]
        viewer: Vec<GridPosition>,

        /// Vision radius in squares (default: 12)
        #[arg(short, long)]
        radius: Option<u32>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Roll {
            notation,
            seed,
            advantage,
            disadvantage,
            reason,
        } => commands::roll::run(&notation, seed, advantage, disadvantage, reason.as_deref()),
        Commands::Distance { from, to } => commands::distance::run(from, to),
        Commands::Initiative {
            party,
            enemies,
            seed,
        } => commands::initiative::run(&party, &enemies, seed),
        Commands::Path {
            map,
            from,
            to,
            max_cost,
        } => commands::path::run(&map, from, to, max_cost),
        Commands::Los { map, from, to } => commands::los::run(&map, from, to),
        Commands::Map {
            map,
            viewer,
            radius,
        } => commands::map::run(&map, &viewer, radius),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
