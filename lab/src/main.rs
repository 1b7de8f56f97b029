use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flappy_lab::benchmark::{resolve_controllers, run_benchmark, BenchmarkConfig};
use flappy_lab::controllers::{controller_manifest_entries, describe_controllers};
use flappy_lab::evolve::{run_evolution, EvolveConfig};
use flappy_lab::highscore;
use flappy_lab::runner::{run_controller, write_json};
use flappy_lab::util::{parse_seed, parse_seed_csv, seed_range, seed_to_hex};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flappy-lab")]
#[command(about = "Evolution lab for deterministic flappy-bird controller evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List available controllers
    ListControllers,
    /// Export the full controller manifest (configs + fingerprints)
    RosterManifest {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate one controller on one seed
    Run {
        #[arg(long)]
        controller: String,
        #[arg(long)]
        seed: String,
        #[arg(long, default_value_t = 20_000)]
        max_ticks: u32,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Persist the run's score if it beats the stored high score
        #[arg(long)]
        highscore_file: Option<PathBuf>,
    },
    /// Run a multi-seed benchmark across one or more controllers
    Benchmark {
        /// Comma-separated ids, or "all"
        #[arg(long)]
        controllers: Option<String>,
        #[arg(long)]
        seeds: Option<String>,
        #[arg(long)]
        seed_start: Option<String>,
        #[arg(long, default_value_t = 12)]
        seed_count: u32,
        #[arg(long, default_value_t = 20_000)]
        max_ticks: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        jobs: Option<usize>,
    },
    /// Evolve neuro-controller genomes against the simulation
    Evolve {
        #[arg(long, default_value_t = 50)]
        population: usize,
        #[arg(long, default_value_t = 20)]
        generations: u32,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value_t = 20_000)]
        max_ticks: u32,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        highscore_file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ListControllers => {
            for (id, description) in describe_controllers() {
                println!("{id:>16}  {description}");
            }
        }
        Commands::RosterManifest { output } => {
            let entries = controller_manifest_entries();
            match output {
                Some(path) => {
                    write_json(&path, &entries)?;
                    eprintln!("wrote manifest with {} entries to {}", entries.len(), path.display());
                }
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&entries).context("failed encoding manifest")?
                ),
            }
        }
        Commands::Run {
            controller,
            seed,
            max_ticks,
            output,
            highscore_file,
        } => {
            let seed = parse_seed(&seed)?;
            let metrics = run_controller(&controller, seed, max_ticks)?;
            if let Some(path) = &highscore_file {
                let standing = highscore::record(path, metrics.score)?;
                eprintln!("high score stands at {standing}");
            }
            if let Some(path) = &output {
                write_json(path, &metrics)?;
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&metrics).context("failed encoding metrics")?
            );
        }
        Commands::Benchmark {
            controllers,
            seeds,
            seed_start,
            seed_count,
            max_ticks,
            out_dir,
            jobs,
        } => {
            let controllers = resolve_controllers(controllers.as_deref())?;
            let seeds = match (seeds, seed_start) {
                (Some(csv), _) => parse_seed_csv(&csv)?,
                (None, Some(start)) => seed_range(parse_seed(&start)?, seed_count),
                (None, None) => seed_range(0x5EED_0000, seed_count),
            };
            if let Some(&first) = seeds.first() {
                eprintln!(
                    "benchmarking {} controller(s) x {} seed(s), first {}",
                    controllers.len(),
                    seeds.len(),
                    seed_to_hex(first),
                );
            }
            run_benchmark(&BenchmarkConfig {
                controllers,
                seeds,
                max_ticks,
                out_dir,
                jobs,
            })?;
        }
        Commands::Evolve {
            population,
            generations,
            seed,
            max_ticks,
            out_dir,
            highscore_file,
        } => {
            let mut cfg = EvolveConfig {
                population,
                generations,
                max_ticks,
                ..EvolveConfig::default()
            };
            if let Some(seed) = seed {
                cfg.seed = parse_seed(&seed)?;
            }
            let summary = run_evolution(&cfg, out_dir.as_deref())?;
            eprintln!(
                "best fitness {:.0} from generation {} (top score {})",
                summary.best_fitness, summary.best_generation, summary.high_score,
            );
            if let Some(path) = &highscore_file {
                let standing = highscore::record(path, summary.high_score)?;
                eprintln!("high score stands at {standing}");
            }
        }
    }

    Ok(())
}
