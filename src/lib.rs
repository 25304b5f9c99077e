//! A single-filter convolutional binary image classifier trained with
//! hand-derived gradients
//!
//! `image → conv(W1) → relu → max pool → · W2 → sigmoid → log loss`

pub mod activation;
pub mod config;
pub mod conv;
pub mod dataset;
pub mod grid;
pub mod loss;
pub mod network;
pub mod padding;
pub mod param;
pub mod pooling;
pub mod report;
pub mod stats;
#[cfg(test)]
mod tests;
