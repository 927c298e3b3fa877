//! World orchestration: one fixed phase sequence per tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::chemistry::{string_dist, Chemistry};
use crate::config::SimConfig;
use crate::genome::Genome;
use crate::grid::{SubstanceField, Torus};
use crate::lineage::LineageTree;
use crate::organism::{OrgId, Organism};
use crate::population::Population;
use crate::source::{self, SubstanceSource};
use crate::stats::PopulationSample;

/// Per-organism genome snapshot for FASTA export.
#[derive(Debug, Clone)]
pub struct GenomeRecord {
    pub name: String,
    pub genes: Vec<String>,
}

/// The simulation world. Owns every component and the single RNG; all
/// mutation happens inside the strictly sequential tick phases.
pub struct World {
    pub config: SimConfig,
    pub rng: ChaCha8Rng,
    pub field: SubstanceField,
    pub chemistry: Chemistry,
    pub sources: Vec<SubstanceSource>,
    pub population: Population,
    pub lineage: Option<LineageTree>,
    /// Global age in ticks.
    pub tick: u64,
    /// Repopulation epoch counter.
    pub generation: u32,
    next_org_id: u64,
    /// Reference sequences for the gene-distance diagnostic, captured
    /// at init for 2-substance single-gene configurations only.
    ref_seqs: Option<[Vec<u8>; 2]>,
}

impl World {
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let seed = config.world.seed.unwrap_or(1);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let torus = Torus::new(config.world.width, config.world.height);

        let chemistry = Chemistry::generate(
            config.world.substances,
            config.genome.gene_length,
            config.chemistry.min_de,
            config.chemistry.max_de,
            &mut rng,
        );

        let sources = if chemistry.good_substances().is_empty() {
            tracing::warn!("no substance is profitable to eat; emitting nothing");
            Vec::new()
        } else {
            (0..config.sources.count)
                .map(|_| {
                    SubstanceSource::random(
                        &config.sources,
                        torus,
                        chemistry.good_substances(),
                        &mut rng,
                    )
                })
                .collect()
        };

        let ref_seqs = (config.world.substances == 2 && config.genome.genes == 1)
            .then(|| [chemistry.gold(0, 1).to_vec(), chemistry.gold(1, 0).to_vec()]);

        let lineage = config.world.track_lineage.then(LineageTree::new);

        let mut world = Self {
            field: SubstanceField::new(torus, config.world.substances),
            population: Population::new(torus),
            chemistry,
            sources,
            lineage,
            rng,
            config,
            tick: 0,
            generation: 0,
            next_org_id: 0,
            ref_seqs,
        };
        world.populate();
        tracing::info!(
            seed,
            population = world.population.len(),
            sources = world.sources.len(),
            "world constructed"
        );
        Ok(world)
    }

    fn next_id(&mut self) -> OrgId {
        let id = self.next_org_id;
        self.next_org_id += 1;
        OrgId(id)
    }

    /// Seeds the population from scratch: random free cells, random
    /// genomes with resolved phenotypes, uniform integer starting
    /// energy. The field is reset to zero. Used both at init and after
    /// extinction; draws landing on an occupied cell are skipped, so
    /// slightly fewer than `start_count` organisms may appear.
    pub fn populate(&mut self) {
        self.field.clear();
        self.population.clear_organisms();

        let width = self.config.world.width;
        let height = self.config.world.height;
        let max_energy_draw = self.config.organism.start_energy as u32;

        for _ in 0..self.config.world.start_count {
            let x = self.rng.gen_range(0..width);
            let y = self.rng.gen_range(0..height);
            if self.population.is_occupied(x as i64, y as i64) {
                continue;
            }
            let energy = self.rng.gen_range(0..max_energy_draw.max(1)) as f32;
            let mut genome = Genome::random(
                self.config.genome.genes,
                self.config.genome.gene_length,
                &mut self.rng,
            );
            for gene in &mut genome.genes {
                self.chemistry.determine_enzyme(gene);
            }
            let soul = self.lineage.as_mut().map(|tree| tree.birth(tree.root()));
            let id = self.next_id();
            self.population.place(Organism {
                id,
                x,
                y,
                energy,
                age: 0,
                snp_rate: self.config.genome.snp_rate,
                genome,
                soul,
            });
        }
    }

    /// Advances the simulation by one tick in the fixed phase order:
    /// emit, reincarnate, diffuse, eat, die, divide, repopulate on
    /// extinction. Each phase completes over the whole grid or
    /// population before the next starts.
    pub fn step(&mut self) {
        self.emit_sources();
        self.reincarnate_sources();
        self.field
            .diffuse(self.config.field.diffusion, self.config.field.decay);
        self.org_eat();
        self.org_die();
        self.org_divide();
        if self.population.is_empty() {
            self.generation += 1;
            tracing::info!(
                tick = self.tick,
                generation = self.generation,
                "population extinct, reseeding"
            );
            self.populate();
        }
        self.tick += 1;
    }

    pub fn emit_sources(&mut self) {
        source::emit_all(&mut self.sources, &mut self.field);
    }

    pub fn reincarnate_sources(&mut self) {
        source::reincarnate_all(
            &mut self.sources,
            &self.config.sources,
            self.field.torus(),
            self.chemistry.good_substances(),
            &mut self.rng,
        );
    }

    /// Eat phase. For each gene: take up to the eat cap of the input
    /// substance from the organism's cell, gain `fitness × eaten × dE`,
    /// return `eaten × fitness` of the output substance to the cell and
    /// pay the expression cost unconditionally. Ages the organism and
    /// clamps energy to the ceiling afterwards.
    ///
    /// `eaten` is `min(cell, cap)` with no lower bound, so a negative
    /// cell concentration propagates; that matches the unclamped field
    /// semantics.
    pub fn org_eat(&mut self) {
        let Self {
            population,
            field,
            chemistry,
            config,
            ..
        } = self;
        let cfg = &config.organism;
        for org in population.orgs_mut() {
            let (x, y) = (org.x as i64, org.y as i64);
            for gene in &org.genome.genes {
                let eaten = field.get(x, y, gene.input).min(cfg.max_eat);
                org.energy += gene.fitness * eaten * chemistry.de(gene.input, gene.output);
                field.add(x, y, gene.input, -eaten);
                field.add(x, y, gene.output, eaten * gene.fitness);
                org.energy -= cfg.expression_cost;
            }
            org.age += 1;
            if org.energy > cfg.max_energy {
                org.energy = cfg.max_energy;
            }
        }
    }

    /// Death phase: removes organisms out of energy or past the age
    /// limit, vacating cells, stamping graveyard genomes and marking
    /// lineage nodes dead (which triggers lazy pruning).
    pub fn org_die(&mut self) {
        let max_age = self.config.organism.max_age;
        let mut dead = Vec::new();
        self.population.extract_dead(
            |org| org.energy <= 0.0 || (max_age >= 0 && i64::from(org.age) > max_age),
            &mut dead,
        );
        if let Some(tree) = &mut self.lineage {
            for org in &dead {
                if let Some(soul) = org.soul {
                    tree.mark_dead(soul);
                }
            }
        }
    }

    /// Division phase. An organism above the energy threshold and past
    /// the minimum age picks a uniformly random free Moore neighbour;
    /// with none free, division silently fails and no energy is spent.
    /// On success the parent's energy is halved, the child receives the
    /// same half, the genome is cloned, mutated and re-resolved, and
    /// the child is placed and attached to the lineage tree.
    pub fn org_divide(&mut self) {
        let threshold = self.config.organism.divide_energy;
        let min_age = self.config.organism.min_divide_age;
        let torus = self.field.torus();

        // Children placed this tick are visible to later parents but
        // are not themselves scanned.
        let scanned = self.population.len();
        for idx in 0..scanned {
            let parent = &self.population.orgs()[idx];
            if parent.energy <= threshold || parent.age <= min_age {
                continue;
            }
            let (px, py) = (parent.x, parent.y);

            let mut free = [(0usize, 0usize); 8];
            let mut free_count = 0;
            for (nx, ny) in torus.moore(px, py) {
                if !self.population.is_occupied(nx as i64, ny as i64) {
                    free[free_count] = (nx, ny);
                    free_count += 1;
                }
            }
            if free_count == 0 {
                continue;
            }
            let (cx, cy) = free[self.rng.gen_range(0..free_count)];

            let id = self.next_id();
            let parent = &mut self.population.orgs_mut()[idx];
            parent.energy /= 2.0;
            let energy = parent.energy;
            let snp_rate = parent.snp_rate;
            let parent_soul = parent.soul;
            let mut genome = parent.genome.clone();

            genome.mutate(snp_rate, &mut self.rng);
            for gene in &mut genome.genes {
                self.chemistry.determine_enzyme(gene);
            }
            let soul = match (&mut self.lineage, parent_soul) {
                (Some(tree), Some(parent_node)) => Some(tree.birth(parent_node)),
                _ => None,
            };
            self.population.place(Organism {
                id,
                x: cx,
                y: cy,
                energy,
                age: 0,
                snp_rate,
                genome,
                soul,
            });
        }
    }

    /// Current population statistics.
    pub fn sample(&self) -> PopulationSample {
        PopulationSample::compute(self.tick, self.generation, self.population.orgs())
    }

    /// Distance of every organism's single gene to the two reference
    /// gold sequences. `None` unless the world runs the two-substance,
    /// single-gene configuration.
    pub fn gene_distances(&self) -> Option<Vec<(f32, f32)>> {
        let refs = self.ref_seqs.as_ref()?;
        Some(
            self.population
                .orgs()
                .iter()
                .filter_map(|org| {
                    let gene = org.genome.genes.first()?;
                    Some((
                        string_dist(&refs[0], &gene.seq, true),
                        string_dist(&refs[1], &gene.seq, true),
                    ))
                })
                .collect(),
        )
    }

    /// Genome snapshots for export. Organism names come from the
    /// lineage tree when assigned; otherwise the stable organism id.
    pub fn genome_records(&self) -> Vec<GenomeRecord> {
        self.population
            .orgs()
            .iter()
            .map(|org| {
                let name = org
                    .soul
                    .and_then(|soul| self.lineage.as_ref().and_then(|t| t.name(soul)))
                    .map(str::to_string)
                    .unwrap_or_else(|| org.id.to_string());
                GenomeRecord {
                    name,
                    genes: org
                        .genome
                        .genes
                        .iter()
                        .map(|g| String::from_utf8_lossy(&g.seq).into_owned())
                        .collect(),
                }
            })
            .collect()
    }

    /// Post-run naming pass over the lineage tree.
    pub fn assign_lineage_names(&mut self) {
        if let Some(tree) = &mut self.lineage {
            tree.assign_names();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenomeConfig, SourceConfig, WorldConfig};

    fn small_config() -> SimConfig {
        SimConfig {
            world: WorldConfig {
                width: 10,
                height: 10,
                substances: 2,
                start_count: 5,
                seed: Some(42),
                ..Default::default()
            },
            sources: SourceConfig {
                count: 1,
                min_radius: 1,
                max_radius: 3,
                ..Default::default()
            },
            genome: GenomeConfig {
                genes: 1,
                gene_length: 20,
                snp_rate: 0.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn construction_fails_fast_on_bad_config() {
        let mut config = small_config();
        config.world.substances = 0;
        assert!(World::new(config).is_err());
    }

    #[test]
    fn seeding_respects_occupancy_and_count() {
        let world = World::new(small_config()).unwrap();
        assert!(world.population.len() <= 5);
        assert!(!world.population.is_empty());
        let mut seen = std::collections::HashSet::new();
        for org in world.population.orgs() {
            assert!(seen.insert((org.x, org.y)), "two organisms share a cell");
        }
    }

    #[test]
    fn phases_keep_occupancy_exclusive() {
        let mut config = small_config();
        config.world.start_count = 40;
        config.organism.divide_energy = 1.0;
        config.organism.min_divide_age = 0;
        let mut world = World::new(config).unwrap();
        for _ in 0..50 {
            world.step();
            let mut seen = std::collections::HashSet::new();
            for org in world.population.orgs() {
                assert!(seen.insert((org.x, org.y)));
                assert!(world.population.is_occupied(org.x as i64, org.y as i64));
            }
        }
    }

    #[test]
    fn gene_distance_diagnostic_gated_on_configuration() {
        let world = World::new(small_config()).unwrap();
        let dists = world.gene_distances().expect("2 substances, 1 gene");
        assert_eq!(dists.len(), world.population.len());

        let mut config = small_config();
        config.world.substances = 3;
        let world = World::new(config).unwrap();
        assert!(world.gene_distances().is_none());
    }

    #[test]
    fn genome_records_fall_back_to_org_ids() {
        let world = World::new(small_config()).unwrap();
        let records = world.genome_records();
        assert_eq!(records.len(), world.population.len());
        for record in &records {
            assert!(record.name.starts_with("org"));
            assert_eq!(record.genes.len(), 1);
            assert_eq!(record.genes[0].len(), 20);
        }
    }

    #[test]
    fn lineage_disabled_leaves_no_souls() {
        let mut config = small_config();
        config.world.track_lineage = false;
        let world = World::new(config).unwrap();
        assert!(world.lineage.is_none());
        assert!(world.population.orgs().iter().all(|o| o.soul.is_none()));
    }
}
