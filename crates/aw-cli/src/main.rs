//! `aw`: run and inspect Amberwake exploration encounters from the terminal.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "aw",
    about = "Amberwake: exploration encounters, companions, and rewards",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spend a material and fight the creature it summons
    Simulate {
        /// Material to spend (e.g. "Dango")
        material: String,

        /// Player fishing skill level
        #[arg(short, long, default_value = "10")]
        skill: u32,

        /// Accessory tier (0 = none; 100 base HP, tiers 4+ raise it)
        #[arg(short, long, default_value = "0")]
        accessory: u32,

        /// Companion as NAME or NAME:LEVEL (repeatable, up to 3)
        #[arg(short, long = "companion")]
        companions: Vec<String>,

        /// Random seed for reproducible encounters
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Run away instead of fighting
        #[arg(long)]
        flee: bool,

        /// Print the full combat log
        #[arg(short, long)]
        verbose: bool,

        /// Print the final session snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Load game tables from a JSON file instead of the built-in set
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// List creatures by material
    Bestiary {
        /// Only show creatures of at least this rank
        #[arg(long)]
        min_rank: Option<u32>,

        /// Show a single creature by name (case-insensitive)
        #[arg(long)]
        creature: Option<String>,

        /// Load game tables from a JSON file instead of the built-in set
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// List companions and their stats at a level
    Companions {
        /// Level to compute stats at
        #[arg(short, long, default_value = "1")]
        level: u32,

        /// Load game tables from a JSON file instead of the built-in set
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },

    /// Write the built-in game tables as JSON
    Tables {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let result = match cli.command {
        Commands::Simulate {
            material,
            skill,
            accessory,
            companions,
            seed,
            flee,
            verbose,
            json,
            tables,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            material,
            skill,
            accessory,
            companions,
            seed,
            flee,
            verbose,
            json,
            tables,
        }),
        Commands::Bestiary {
            min_rank,
            creature,
            tables,
        } => commands::bestiary::run(tables.as_deref(), min_rank, creature.as_deref()),
        Commands::Companions { level, tables } => {
            commands::companions::run(tables.as_deref(), level)
        }
        Commands::Tables { output } => commands::tables::run(output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::miette!("{e}"));
        process::exit(1);
    }
}
