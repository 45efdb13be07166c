//! Binary entrypoint for the Dust Guild CLI.
//!
//! A thin shell over the engine, mainly for operating a deployment and
//! poking at a save file from the command line:
//! - `init` - create a starter `config.toml`
//! - `status` - print save-record statistics
//! - `attend`, `explore`, `duel`, `dungeon`, `buy`, `enhance`, `rename`,
//!   `grant` - run one engine operation for a given identity and print the
//!   outcome
//!
//! The chat dispatcher that normally drives these operations lives in a
//! separate service; outcomes here are printed with `Debug` formatting.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use dustguild::config::Config;
use dustguild::game::{self, GameStore, StaticFlavor, StdDice};

#[derive(Parser)]
#[command(name = "dustguild")]
#[command(about = "Persistent mini-RPG engine for chat bots")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config.toml
    Init,
    /// Print save-record statistics
    Status,
    /// Daily attendance check-in
    Attend {
        /// Identity key (e.g. a chat user id)
        id: String,
    },
    /// One field exploration outing
    Explore { id: String },
    /// PvP duel against a named character, or a random one
    Duel {
        id: String,
        /// Opponent character name; random when omitted
        opponent: Option<String>,
    },
    /// Dungeon crawl actions
    Dungeon {
        id: String,
        #[command(subcommand)]
        action: DungeonAction,
    },
    /// Buy a shop item by label
    Buy { id: String, label: String },
    /// Attempt a weapon enhancement
    Enhance { id: String },
    /// Rename the character
    Rename { id: String, name: String },
    /// Grant dust to an identity (operator action)
    Grant { id: String, amount: i64 },
}

#[derive(Subcommand)]
enum DungeonAction {
    Enter,
    Step,
    Exit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if matches!(cli.command, Commands::Init) {
        Config::create_default(&cli.config)?;
        println!("Wrote starter configuration to {}", cli.config);
        return Ok(());
    }

    let config = Config::load(&cli.config)?;
    let mut store = GameStore::open_dir(&config.storage.data_dir);
    let mut dice = StdDice::from_entropy();
    let mut flavor = StaticFlavor;
    let today = game::daily::today(config.daily.utc_offset_hours);

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Status => {
            println!(
                "users: {}, characters: {}",
                store.user_count(),
                store.character_count()
            );
        }
        Commands::Attend { id } => {
            let outcome = game::rewards::attendance(&mut store, &config.rewards, &mut dice, &id, today);
            println!("{outcome:?}");
        }
        Commands::Explore { id } => {
            let outcome = game::rewards::explore_field(
                &mut store,
                &config.daily,
                &config.rewards,
                &mut dice,
                &mut flavor,
                &id,
                today,
            );
            println!("{outcome:?}");
        }
        Commands::Duel { id, opponent } => {
            let outcome = game::battle::duel(
                &mut store,
                &config.daily,
                &config.battle,
                &mut dice,
                &id,
                opponent.as_deref(),
                today,
            );
            println!("{outcome:?}");
        }
        Commands::Dungeon { id, action } => match action {
            DungeonAction::Enter => {
                println!("{:?}", game::dungeon::enter(&mut store, &id, today));
            }
            DungeonAction::Step => {
                let outcome = game::dungeon::step(
                    &mut store,
                    &config.dungeon,
                    &config.battle,
                    &config.rewards,
                    &mut dice,
                    &mut flavor,
                    &id,
                );
                println!("{outcome:?}");
            }
            DungeonAction::Exit => {
                println!("{:?}", game::dungeon::exit(&mut store, &id));
            }
        },
        Commands::Buy { id, label } => {
            println!("{:?}", game::shop::buy(&mut store, &id, &label));
        }
        Commands::Enhance { id } => {
            let outcome = game::enhance::enhance_weapon(&mut store, &config.enhance, &mut dice, &id);
            println!("{outcome:?}");
        }
        Commands::Rename { id, name } => {
            println!("{:?}", game::progression::rename_character(&mut store, &id, &name));
        }
        Commands::Grant { id, amount } => {
            let balance = game::economy::add_dust(&mut store, &id, amount);
            info!("operator grant: {amount} dust to {id}");
            println!("balance: {balance}");
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
