//! Genes, genomes and the SNP mutation pass.

use rand::Rng;
use rand_distr::{Distribution, Poisson};

/// The 4-symbol genetic alphabet.
pub const ALPHABET: [u8; 4] = *b"ATGC";

/// Uniformly random sequence over [`ALPHABET`].
pub fn random_seq<R: Rng>(length: usize, rng: &mut R) -> Vec<u8> {
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

/// A catalytic sequence plus its derived phenotype.
///
/// `input`, `output` and `fitness` are recomputed from `seq` by
/// [`crate::chemistry::Chemistry::determine_enzyme`] whenever the
/// sequence changes; they are never authoritative on their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    pub seq: Vec<u8>,
    pub input: usize,
    pub output: usize,
    pub fitness: f32,
}

impl Gene {
    /// A gene with an unresolved phenotype.
    pub fn new(seq: Vec<u8>) -> Self {
        Self {
            seq,
            input: 0,
            output: 0,
            fitness: 0.0,
        }
    }
}

/// Ordered gene collection of one organism. Non-empty while the owner
/// lives; the order is arbitrary but stable across clone and mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Genome {
    pub genes: Vec<Gene>,
}

impl Genome {
    /// Random genome with unresolved phenotypes.
    pub fn random<R: Rng>(genes: usize, gene_length: usize, rng: &mut R) -> Self {
        Self {
            genes: (0..genes)
                .map(|_| Gene::new(random_seq(gene_length, rng)))
                .collect(),
        }
    }

    pub fn total_len(&self) -> usize {
        self.genes.iter().map(|g| g.seq.len()).sum()
    }

    /// Mean fitness over this organism's genes.
    pub fn mean_fitness(&self) -> f32 {
        if self.genes.is_empty() {
            return 0.0;
        }
        self.genes.iter().map(|g| g.fitness).sum::<f32>() / self.genes.len() as f32
    }

    /// Applies the division-time SNP pass.
    ///
    /// The SNP count is Poisson-distributed with mean
    /// `total_len × snp_rate`. Each SNP picks a gene and a position as
    /// two independent uniform draws and overwrites one symbol with a
    /// uniformly random alphabet symbol, which may equal the original.
    /// Returns the number of SNPs applied; the caller is responsible
    /// for re-resolving phenotypes afterwards.
    pub fn mutate<R: Rng>(&mut self, snp_rate: f32, rng: &mut R) -> usize {
        let mean = self.total_len() as f64 * snp_rate as f64;
        if mean <= 0.0 || self.genes.is_empty() {
            return 0;
        }
        let Ok(poisson) = Poisson::new(mean) else {
            return 0;
        };
        let count = poisson.sample(rng) as usize;
        for _ in 0..count {
            let g = rng.gen_range(0..self.genes.len());
            let gene = &mut self.genes[g];
            if gene.seq.is_empty() {
                continue;
            }
            let pos = rng.gen_range(0..gene.seq.len());
            gene.seq[pos] = ALPHABET[rng.gen_range(0..ALPHABET.len())];
        }
        count
    }
}
