//! Pairing transformer: wide flow CSV → narrow `source,target,value` edge list

pub mod transformer;

pub use transformer::{pair_row, transform, transform_reader, PairingOptions, PairingSummary};
