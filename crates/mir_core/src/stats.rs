//! Per-tick population statistics.

use crate::organism::Organism;

/// One population sample, emitted at the logging cadence.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSample {
    pub tick: u64,
    /// Repopulation epoch (bumped on every extinction reseed).
    pub generation: u32,
    pub population: usize,
    /// Mean of per-organism mean fitness.
    pub mean_fitness: f32,
    /// Mean fitness over every gene in the population.
    pub mean_gene_fitness: f32,
    /// Median of per-organism mean fitness.
    pub median_fitness: f32,
    /// Maximum of per-organism mean fitness.
    pub max_fitness: f32,
}

impl PopulationSample {
    pub fn compute(tick: u64, generation: u32, orgs: &[Organism]) -> Self {
        if orgs.is_empty() {
            return Self {
                tick,
                generation,
                population: 0,
                mean_fitness: 0.0,
                mean_gene_fitness: 0.0,
                median_fitness: 0.0,
                max_fitness: 0.0,
            };
        }

        let mut gene_sum = 0.0f64;
        let mut gene_count = 0usize;
        let mut fits: Vec<f32> = Vec::with_capacity(orgs.len());
        for org in orgs {
            for gene in &org.genome.genes {
                gene_sum += gene.fitness as f64;
                gene_count += 1;
            }
            fits.push(org.mean_fitness());
        }
        fits.sort_by(f32::total_cmp);

        Self {
            tick,
            generation,
            population: orgs.len(),
            mean_fitness: fits.iter().map(|&f| f as f64).sum::<f64>() as f32
                / fits.len() as f32,
            mean_gene_fitness: if gene_count == 0 {
                0.0
            } else {
                (gene_sum / gene_count as f64) as f32
            },
            median_fitness: fits[fits.len() / 2],
            max_fitness: fits[fits.len() - 1],
        }
    }
}
