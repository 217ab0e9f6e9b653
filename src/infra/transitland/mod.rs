pub mod client;

pub use client::TransitlandClient;
