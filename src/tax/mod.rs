//! GST jurisdiction split for Indian tax compliance

pub mod split;

pub use split::*;
