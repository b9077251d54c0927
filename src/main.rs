use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use marchplan::{
    catalog::BattleCatalog,
    combat::pressure::DEFAULT_EXPONENT,
    estimator::estimate_win_pct,
    optimizer::{recommend_formation_with_hook, SearchPhase},
    report::BattleReport,
    setup::SetupLoader,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Battle win-rate estimator and formation optimizer")]
struct Cli {
    /// Optional battle-type catalog YAML overriding the built-in one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate the win rate for a battle setup, both directions
    Estimate {
        /// Path to the battle setup YAML file
        setup: PathBuf,

        /// Override the setup's trial count
        #[arg(long)]
        sims: Option<u32>,

        /// Override the setup's battle type id
        #[arg(long)]
        battle_type: Option<u32>,
    },
    /// Search for the best formation and required march size
    Recommend {
        /// Path to the battle setup YAML file
        setup: PathBuf,

        /// Override the setup's trial count
        #[arg(long)]
        sims: Option<u32>,

        /// Override the setup's battle type id
        #[arg(long)]
        battle_type: Option<u32>,

        /// Override the setup's march size
        #[arg(long)]
        march_size: Option<u64>,

        /// Override the setup's target win rate
        #[arg(long)]
        target_win: Option<f64>,

        /// Write a JSON report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// List the active battle-type catalog
    BattleTypes,
    /// Serve the interactive advisor UI
    Serve {
        /// Path to the battle setup YAML file
        setup: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8787)]
        port: u16,
    },
}

fn load_catalog(path: &Option<PathBuf>) -> Result<BattleCatalog> {
    match path {
        Some(path) => BattleCatalog::load(path),
        None => Ok(BattleCatalog::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = load_catalog(&cli.catalog)?;
    let loader = SetupLoader::new(".");

    match cli.command {
        Command::Estimate {
            setup,
            sims,
            battle_type,
        } => {
            let setup = loader.load(setup)?;
            let (my, enemy) = setup.build_sides()?;
            let sims = sims.unwrap_or(setup.sims);
            let battle_type = battle_type.unwrap_or(setup.battle_type);
            let forward =
                estimate_win_pct(&my, &enemy, &catalog, battle_type, sims, DEFAULT_EXPONENT);
            let reverse =
                estimate_win_pct(&enemy, &my, &catalog, battle_type, sims, DEFAULT_EXPONENT);
            println!(
                "Setup '{}' ({}, {} trials)",
                setup.name,
                catalog.get(battle_type).label,
                sims
            );
            println!("  my side wins:    {:.1}%", forward * 100.0);
            println!("  enemy side wins: {:.1}%", reverse * 100.0);
        }
        Command::Recommend {
            setup,
            sims,
            battle_type,
            march_size,
            target_win,
            report,
        } => {
            let setup = loader.load(setup)?;
            let (my, enemy) = setup.build_sides()?;
            let sims = sims.unwrap_or(setup.sims);
            let battle_type = battle_type.unwrap_or(setup.battle_type);
            let march_size = march_size.unwrap_or(setup.march_size);
            let target_win = target_win.unwrap_or(setup.target_win);

            let mut last_phase: Option<SearchPhase> = None;
            let result = recommend_formation_with_hook(
                &my,
                &enemy,
                &catalog,
                battle_type,
                march_size,
                target_win,
                sims,
                |progress| {
                    if last_phase != Some(progress.phase) {
                        last_phase = Some(progress.phase);
                        println!("  {:?} pass...", progress.phase);
                    }
                },
            );

            println!(
                "Best formation for '{}': {}% infantry / {}% cavalry / {}% archers",
                setup.name,
                result.formation.infantry,
                result.formation.cavalry,
                result.formation.archers
            );
            println!("  estimated win rate: {:.1}%", result.win_pct * 100.0);
            println!(
                "  troops at march {}: {} / {} / {}",
                march_size,
                result.troops.infantry,
                result.troops.cavalry,
                result.troops.archers
            );
            match result.required_march_size {
                Some(size) => println!("  march size needed for {:.0}% target: {}", target_win * 100.0, size),
                None if result.win_pct >= target_win => {
                    println!("  target already met at current march size")
                }
                None => println!("  target unreachable within a 10x march"),
            }

            if let Some(path) = report {
                let battle_label = catalog.get(battle_type).label.clone();
                let report = BattleReport::new(
                    setup.name.clone(),
                    battle_label,
                    march_size,
                    target_win,
                    result,
                );
                let written = report.write(&path)?;
                println!("  report written to {}", written.display());
            }
        }
        Command::BattleTypes => {
            println!("id  label             intensity  skill factor");
            for bt in &catalog.battle_types {
                println!(
                    "{:<3} {:<17} {:<10} {}",
                    bt.id, bt.label, bt.intensity, bt.extra_skill_factor
                );
            }
        }
        Command::Serve { setup, host, port } => {
            let setup = loader.load(setup)?;
            web::run(WebServerConfig {
                setup,
                catalog,
                host,
                port,
            })
            .await?;
        }
    }

    Ok(())
}
