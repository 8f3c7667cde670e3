// Veracity: explainable trust scoring for location reviews
//
// This is the library root. Each module corresponds to a stage of the
// scoring pipeline or to one of its interfaces.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod dataset;
pub mod detection;
pub mod error;
pub mod media;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod sentiment;
pub mod text;

#[cfg(feature = "web")]
pub mod web;
