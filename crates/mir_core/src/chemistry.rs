//! Static world chemistry: the energy-differential matrix, the gold
//! sequence table and genotype-to-enzyme resolution.

use rand::Rng;

use crate::genome::{random_seq, Gene};

/// Positional sequence distance used for enzyme matching.
///
/// Aligned positions up to the shorter length are compared; with
/// `syn_on` every third position (`i % 3 == 0`) is a wobble position
/// and excluded from both the match and the comparison count. The
/// result is the mismatch fraction plus a signed length penalty of 0.2
/// per unit of `a.len() - b.len()`. This is a cheap positional
/// comparator, not an edit distance: there is no indel alignment.
pub fn string_dist(a: &[u8], b: &[u8], syn_on: bool) -> f32 {
    let size_diff = a.len() as f32 - b.len() as f32;
    let min_len = a.len().min(b.len());
    let mut matched = 0u32;
    let mut counted = 0u32;
    for i in 0..min_len {
        if syn_on && i % 3 == 0 {
            continue;
        }
        if a[i] == b[i] {
            matched += 1;
        }
        counted += 1;
    }
    let match_frac = if counted == 0 {
        0.0
    } else {
        matched as f32 / counted as f32
    };
    1.0 - match_frac + 0.2 * size_diff
}

/// Immutable chemistry generated once at world construction.
#[derive(Debug, Clone)]
pub struct Chemistry {
    substances: usize,
    /// Row-major S×S energy yields, antisymmetric with zero diagonal.
    de: Vec<f32>,
    /// Reference sequence per ordered pair (i, j); empty on the diagonal.
    gold: Vec<Vec<u8>>,
    /// Substances with at least one profitable outgoing conversion.
    good: Vec<usize>,
}

impl Chemistry {
    pub fn generate<R: Rng>(
        substances: usize,
        gene_length: usize,
        min_de: f32,
        max_de: f32,
        rng: &mut R,
    ) -> Self {
        let mut de = vec![0.0f32; substances * substances];
        for i in 0..substances {
            for j in 0..=i {
                let value = if i == j {
                    0.0
                } else {
                    rng.gen_range(min_de..max_de)
                };
                de[i * substances + j] = value;
                de[j * substances + i] = -value;
            }
        }

        let mut gold = vec![Vec::new(); substances * substances];
        for i in 0..substances {
            for j in 0..substances {
                if i == j {
                    continue;
                }
                gold[i * substances + j] = random_seq(gene_length, rng);
            }
        }

        let good: Vec<usize> = (0..substances)
            .filter(|&i| (0..substances).any(|j| de[i * substances + j] > 0.0))
            .collect();

        tracing::debug!(
            substances,
            good = good.len(),
            "chemistry generated"
        );

        Self {
            substances,
            de,
            gold,
            good,
        }
    }

    pub fn substances(&self) -> usize {
        self.substances
    }

    /// Energy yield of converting substance `i` into `j`.
    #[inline]
    pub fn de(&self, i: usize, j: usize) -> f32 {
        self.de[i * self.substances + j]
    }

    /// Gold sequence for the ordered pair (i, j); empty for i == j.
    pub fn gold(&self, i: usize, j: usize) -> &[u8] {
        &self.gold[i * self.substances + j]
    }

    /// Substances worth emitting: something profitable eats them.
    pub fn good_substances(&self) -> &[usize] {
        &self.good
    }

    /// Resolves a gene's phenotype by nearest gold sequence.
    ///
    /// Scans every ordered substance pair, short-circuits on an exact
    /// match and otherwise keeps the minimising pair. Fitness is
    /// `1 - min_dist`, clamped into [0, 1]. Must be called whenever a
    /// gene's sequence changes.
    pub fn determine_enzyme(&self, gene: &mut Gene) {
        let mut min_dist = f32::INFINITY;
        for i in 0..self.substances {
            for j in 0..self.substances {
                if i == j {
                    continue;
                }
                let dist = string_dist(&gene.seq, self.gold(i, j), true);
                if dist == 0.0 {
                    gene.input = i;
                    gene.output = j;
                    gene.fitness = 1.0;
                    return;
                }
                if dist < min_dist {
                    min_dist = dist;
                    gene.input = i;
                    gene.output = j;
                }
            }
        }
        gene.fitness = (1.0 - min_dist).clamp(0.0, 1.0);
    }
}
