//! The live population: a flat organism collection plus the exclusive
//! occupancy grid and the graveyard of last-seen genomes.

use crate::genome::Genome;
use crate::grid::Torus;
use crate::organism::Organism;

#[derive(Debug)]
pub struct Population {
    torus: Torus,
    orgs: Vec<Organism>,
    occupied: Vec<bool>,
    /// Last genome of whatever died in each cell. Survives reseeding.
    graveyard: Vec<Option<Genome>>,
}

impl Population {
    pub fn new(torus: Torus) -> Self {
        Self {
            torus,
            orgs: Vec::new(),
            occupied: vec![false; torus.cell_count()],
            graveyard: vec![None; torus.cell_count()],
        }
    }

    pub fn len(&self) -> usize {
        self.orgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orgs.is_empty()
    }

    pub fn orgs(&self) -> &[Organism] {
        &self.orgs
    }

    pub fn orgs_mut(&mut self) -> &mut [Organism] {
        &mut self.orgs
    }

    /// Occupancy lookup with toroidal wraparound.
    pub fn is_occupied(&self, x: i64, y: i64) -> bool {
        let (x, y) = self.torus.wrap(x, y);
        self.occupied[self.torus.index(x, y)]
    }

    pub fn graveyard_at(&self, x: i64, y: i64) -> Option<&Genome> {
        let (x, y) = self.torus.wrap(x, y);
        self.graveyard[self.torus.index(x, y)].as_ref()
    }

    /// Inserts an organism into the flat collection and its cell.
    ///
    /// Occupancy is exclusive; placing into an occupied cell is an
    /// internal-consistency defect, not a recoverable condition.
    pub fn place(&mut self, org: Organism) {
        let idx = self.torus.index(org.x, org.y);
        assert!(
            !self.occupied[idx],
            "occupancy violated at ({}, {})",
            org.x,
            org.y
        );
        self.occupied[idx] = true;
        self.orgs.push(org);
    }

    /// Removes every organism matching `dying`, preserving the order of
    /// survivors. Each removed organism vacates its cell and stamps its
    /// genome into the graveyard; the records are appended to `out` so
    /// the caller can settle lineage bookkeeping.
    pub fn extract_dead<F>(&mut self, mut dying: F, out: &mut Vec<Organism>)
    where
        F: FnMut(&Organism) -> bool,
    {
        let mut kept = Vec::with_capacity(self.orgs.len());
        for org in self.orgs.drain(..) {
            if dying(&org) {
                let idx = self.torus.index(org.x, org.y);
                self.occupied[idx] = false;
                self.graveyard[idx] = Some(org.genome.clone());
                out.push(org);
            } else {
                kept.push(org);
            }
        }
        self.orgs = kept;
    }

    /// Drops all organisms and clears occupancy. The graveyard keeps
    /// its records.
    pub fn clear_organisms(&mut self) {
        self.orgs.clear();
        self.occupied.fill(false);
    }
}
