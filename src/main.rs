use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use mir_core::{SimConfig, World};
use mir_io::{GeneDistLog, PopulationLog};
use tracing_subscriber::EnvFilter;

/// Progress echo cadence, in ticks.
const ECHO_INTERVAL: u64 = 1000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chemistry-driven artificial-life simulator", long_about = None)]
struct Args {
    /// RNG seed; a fixed seed reproduces a run exactly
    #[arg(short, long)]
    seed: Option<u64>,

    /// Config file path (defaults are used when the file is missing)
    #[arg(short, long, default_value = "mir.toml")]
    config: PathBuf,

    /// Population statistics log
    #[arg(long, default_value = "populationLog.txt")]
    pop_log: PathBuf,

    /// Gene-distance diagnostic log (2-substance single-gene runs only)
    #[arg(long, default_value = "geneDist.txt")]
    gene_dist_log: PathBuf,

    /// Directory for FASTA genome dumps
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn load_config(path: &Path) -> Result<SimConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => SimConfig::from_toml(&content),
        Err(_) => {
            tracing::warn!(path = %path.display(), "no config file, working on defaults");
            Ok(SimConfig::default())
        }
    }
}

fn save_genomes(world: &World, out_dir: &Path) {
    let path = out_dir.join(format!("MirAge_{}.fasta", world.tick));
    if let Err(e) = mir_io::write_genomes(&path, &world.genome_records()) {
        tracing::warn!(error = %e, path = %path.display(), "genome export failed");
    }
}

/// Drives the world through its configured lifetime. Sampling happens
/// before each step, so the freshly seeded state appears in the logs as
/// tick 0.
fn run(
    world: &mut World,
    mut pop_log: Option<PopulationLog>,
    mut gene_dist_log: Option<GeneDistLog>,
    out_dir: &Path,
) {
    let lifetime = world.config.world.lifetime;
    while world.tick <= lifetime {
        if world.tick % world.config.world.log_interval == 0 {
            let sample = world.sample();
            if let Some(mut log) = pop_log.take() {
                match log.log(&sample) {
                    Ok(()) => pop_log = Some(log),
                    Err(e) => tracing::warn!(error = %e, "population log write failed, disabling"),
                }
            }
            if world.config.world.save_genomes {
                save_genomes(world, out_dir);
            }
        }

        if world.tick % world.config.world.gene_dist_interval == 0 {
            if let (Some(mut log), Some(distances)) =
                (gene_dist_log.take(), world.gene_distances())
            {
                match log.log(world.tick, &distances) {
                    Ok(()) => gene_dist_log = Some(log),
                    Err(e) => {
                        tracing::warn!(error = %e, "gene-distance log write failed, disabling")
                    }
                }
            }
        }

        if world.tick % ECHO_INTERVAL == 0 {
            let sample = world.sample();
            tracing::info!(
                tick = world.tick,
                generation = sample.generation,
                orgs = sample.population,
                mean_fit = sample.mean_gene_fitness,
                "progress"
            );
        }

        world.step();
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    let mut world = World::new(config)?;

    // A log that cannot be opened disables that feature, never the run.
    let pop_log = match PopulationLog::create(&args.pop_log) {
        Ok(log) => Some(log),
        Err(e) => {
            tracing::warn!(error = %e, "population log disabled");
            None
        }
    };
    let gene_dist_log = if world.gene_distances().is_some() {
        match GeneDistLog::create(&args.gene_dist_log) {
            Ok(log) => Some(log),
            Err(e) => {
                tracing::warn!(error = %e, "gene-distance log disabled");
                None
            }
        }
    } else {
        None
    };

    run(&mut world, pop_log, gene_dist_log, &args.out_dir);

    if world.lineage.is_some() {
        world.assign_lineage_names();
        save_genomes(&world, &args.out_dir);
    }
    tracing::info!(tick = world.tick, "run finished");
    Ok(())
}
