//! Test fixtures for fleet-tour-planner.
//!
//! Provides small road networks with known shortest paths:
//! - The five-location loop used throughout the scenario tests
//! - A rush-hour variant of it where one link triples at 07:00-09:59
//! - A square grid with slower east-west streets in the evening

pub mod sample_network;

pub use sample_network::*;
