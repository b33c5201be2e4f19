//! Application services

pub mod structure;

pub use structure::{DocumentOutcome, StructureService};
