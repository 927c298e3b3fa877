//! Tab-separated run logs: population statistics and the gene-distance
//! diagnostic.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mir_core::stats::PopulationSample;

use crate::error::Result;

/// Appends one row per population sample. Rows are flushed immediately
/// so a killed run still leaves a usable log.
pub struct PopulationLog {
    writer: BufWriter<File>,
}

impl PopulationLog {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(
            writer,
            "tick\tgeneration\torgs\tmeanFit\tmeanGeneFit\tmedianFit\tmaxFit"
        )?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn log(&mut self, sample: &PopulationSample) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            sample.tick,
            sample.generation,
            sample.population,
            sample.mean_fitness,
            sample.mean_gene_fitness,
            sample.median_fitness,
            sample.max_fitness
        )?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Per-organism distances to the two reference gold sequences, one row
/// per organism per sample. Only meaningful for the two-substance,
/// single-gene configuration.
pub struct GeneDistLog {
    writer: BufWriter<File>,
}

impl GeneDistLog {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "tick\td1\td2")?;
        writer.flush()?;
        Ok(Self { writer })
    }

    pub fn log(&mut self, tick: u64, distances: &[(f32, f32)]) -> Result<()> {
        for (d1, d2) in distances {
            writeln!(self.writer, "{tick}\t{d1:.6}\t{d2:.6}")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
