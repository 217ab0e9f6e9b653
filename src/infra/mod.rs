//! HTTP clients for the external feed registries.

pub mod transitfeeds;
pub mod transitland;
