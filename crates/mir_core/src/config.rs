//! Simulation parameters, loaded once at startup from TOML.
//!
//! Every tunable the engine reads lives here as a plain field with a
//! built-in default matching the historical parameter set. Unspecified
//! keys in the file keep their defaults; a missing file is not an error
//! (the caller falls back to `SimConfig::default()`).
//!
//! ## Example `mir.toml`
//!
//! ```toml
//! [world]
//! width = 100
//! height = 100
//! substances = 2
//! seed = 42
//!
//! [genome]
//! genes = 1
//! gene_length = 20
//! snp_rate = 0.1
//! ```

use serde::{Deserialize, Serialize};

/// Grid dimensions, run length and the logging/tracking switches.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WorldConfig {
    pub width: usize,
    pub height: usize,
    /// Number of distinct diffusible substances.
    pub substances: usize,
    /// Number of organisms seeded at start and after extinction.
    pub start_count: usize,
    /// Tick budget; the run stops once the world age exceeds this.
    pub lifetime: u64,
    pub seed: Option<u64>,
    /// Cadence of population samples, in ticks.
    pub log_interval: u64,
    /// Cadence of the gene-distance diagnostic, in ticks.
    pub gene_dist_interval: u64,
    /// Dump genomes to FASTA at every population sample.
    pub save_genomes: bool,
    /// Maintain the ancestry tree (naming and FASTA headers need it).
    pub track_lineage: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            substances: 2,
            start_count: 1000,
            lifetime: 100_000_000,
            seed: None,
            log_interval: 1000,
            gene_dist_interval: 1000,
            save_genomes: false,
            track_lineage: true,
        }
    }
}

/// Substance field dynamics.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FieldConfig {
    /// Fraction of each cell replaced by the Moore-neighbourhood mean.
    pub diffusion: f32,
    /// Uniform per-tick retention factor (< 1 loses substance).
    pub decay: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            diffusion: 0.5,
            decay: 0.99,
        }
    }
}

/// Substance source population.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub count: usize,
    pub min_radius: i32,
    pub max_radius: i32,
    /// Per-cell injection per tick is drawn uniformly below this.
    pub max_intensity: f32,
    /// Expected ticks between re-randomizations; negative disables.
    pub lifetime: i64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            count: 10,
            min_radius: 1,
            max_radius: 40,
            max_intensity: 100.0,
            lifetime: 1000,
        }
    }
}

/// Energy-differential matrix bounds.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ChemistryConfig {
    pub min_de: f32,
    pub max_de: f32,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            min_de: -5.0,
            max_de: 5.0,
        }
    }
}

/// Initial genome shape and the per-lineage mutation rate.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenomeConfig {
    pub genes: usize,
    pub gene_length: usize,
    /// Expected SNPs per division = total genome length × this rate.
    pub snp_rate: f32,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            genes: 1,
            gene_length: 20,
            snp_rate: 0.1,
        }
    }
}

/// Organism energy budget and life-cycle thresholds.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OrganismConfig {
    /// Seed organisms start with a uniform integer energy below this.
    pub start_energy: f32,
    /// Division requires energy above this.
    pub divide_energy: f32,
    /// Division requires age above this.
    pub min_divide_age: u32,
    /// Death past this age; negative disables the age limit.
    pub max_age: i64,
    /// Energy paid per gene per tick regardless of food.
    pub expression_cost: f32,
    /// Per-gene cap on substance taken from a cell in one tick.
    pub max_eat: f32,
    /// Energy ceiling applied after the eat phase.
    pub max_energy: f32,
}

impl Default for OrganismConfig {
    fn default() -> Self {
        Self {
            start_energy: 70.0,
            divide_energy: 700.0,
            min_divide_age: 100,
            max_age: 3000,
            expression_cost: 1.0,
            max_eat: 0.6,
            max_energy: 1000.0,
        }
    }
}

/// Immutable configuration snapshot handed to the world at construction.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub field: FieldConfig,
    pub sources: SourceConfig,
    pub chemistry: ChemistryConfig,
    pub genome: GenomeConfig,
    pub organism: OrganismConfig,
}

impl SimConfig {
    /// Checks every parameter the engine cannot tolerate being wrong.
    ///
    /// Anything that would make per-tick behaviour undefined (no
    /// substances to convert, an empty grid, an empty gold table) fails
    /// here rather than mid-run.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0, "world width must be positive");
        anyhow::ensure!(self.world.height > 0, "world height must be positive");
        anyhow::ensure!(
            self.world.substances >= 2,
            "at least two substances are required for enzyme resolution"
        );
        anyhow::ensure!(
            self.world.start_count > 0,
            "starting population must be positive"
        );
        anyhow::ensure!(self.world.log_interval > 0, "log interval must be positive");
        anyhow::ensure!(
            self.world.gene_dist_interval > 0,
            "gene distance interval must be positive"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.field.diffusion),
            "diffusion rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.field.decay),
            "decay factor must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.sources.min_radius >= 0,
            "source radius must be non-negative"
        );
        anyhow::ensure!(
            self.sources.max_radius >= self.sources.min_radius,
            "max source radius must be >= min source radius"
        );
        anyhow::ensure!(
            self.sources.max_intensity > 0.0,
            "source intensity bound must be positive"
        );

        anyhow::ensure!(
            self.chemistry.max_de > self.chemistry.min_de,
            "dE range must be non-empty"
        );

        anyhow::ensure!(self.genome.genes > 0, "organisms need at least one gene");
        anyhow::ensure!(
            self.genome.gene_length > 0,
            "gene length must be positive"
        );
        anyhow::ensure!(
            self.genome.snp_rate >= 0.0,
            "SNP rate must be non-negative"
        );

        anyhow::ensure!(
            self.organism.start_energy >= 1.0,
            "starting energy must be at least 1"
        );
        anyhow::ensure!(
            self.organism.divide_energy > 0.0,
            "division threshold must be positive"
        );
        anyhow::ensure!(self.organism.max_eat > 0.0, "eat cap must be positive");
        anyhow::ensure!(
            self.organism.max_energy > 0.0,
            "energy ceiling must be positive"
        );
        anyhow::ensure!(
            self.organism.expression_cost >= 0.0,
            "expression cost must be non-negative"
        );

        Ok(())
    }

    /// Parses and validates a TOML snapshot.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}
