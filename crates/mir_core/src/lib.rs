//! Simulation engine for `mir`, a discrete-time spatial artificial-life
//! model: substances diffuse over a toroidal grid, organisms carry
//! genomes of catalytic genes that convert one substance into another
//! for energy, and an ancestry tree tracks descent across the run.
//!
//! The engine is strictly sequential and purely in-memory; all I/O
//! lives in `mir_io` and the binary.

pub mod chemistry;
pub mod config;
pub mod genome;
pub mod grid;
pub mod lineage;
pub mod organism;
pub mod population;
pub mod source;
pub mod stats;
pub mod world;

pub use config::SimConfig;
pub use world::World;
