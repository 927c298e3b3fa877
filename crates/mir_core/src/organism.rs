//! The organism record.

use std::fmt;

use crate::genome::Genome;
use crate::lineage::NodeId;

/// Identifier drawn from the world's counter; unique for a whole run,
/// including across extinction reseeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrgId(pub u64);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "org{}", self.0)
    }
}

/// One grid-dwelling organism.
///
/// Exactly one organism occupies a cell; `x`/`y` are authoritative and
/// kept in lock-step with the population's occupancy grid. `soul` is
/// the organism's lineage-tree node, present only when tracking is on;
/// the node outlives the organism.
#[derive(Debug, Clone)]
pub struct Organism {
    pub id: OrgId,
    pub x: usize,
    pub y: usize,
    pub energy: f32,
    /// Ticks since creation.
    pub age: u32,
    /// Per-lineage mutation rate, inherited unchanged by children.
    pub snp_rate: f32,
    pub genome: Genome,
    pub soul: Option<NodeId>,
}

impl Organism {
    /// Mean fitness over this organism's genes.
    pub fn mean_fitness(&self) -> f32 {
        self.genome.mean_fitness()
    }
}
