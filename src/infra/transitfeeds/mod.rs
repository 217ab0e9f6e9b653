pub mod client;

pub use client::TransitFeedsClient;
