//! File output for `mir` runs: population/gene-distance logs and FASTA
//! genome export. Failures here disable a feature, never the run.

pub mod error;
pub mod fasta;
pub mod logs;

pub use error::{IoError, Result};
pub use fasta::write_genomes;
pub use logs::{GeneDistLog, PopulationLog};
