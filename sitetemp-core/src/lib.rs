//! Core library for the `sitetemp` model inspector.
//!
//! This crate defines:
//! - The NASA POWER temperature resolver and its extraction chain
//! - Selection-payload metadata access and coordinate discovery
//! - Trend-chart rendering and the simulated-series fallback
//! - Configuration handling
//!
//! It is used by `sitetemp-cli`, but can also be reused by other binaries or services.

pub mod chart;
pub mod config;
pub mod extract;
pub mod model;
pub mod object;
pub mod provider;
pub mod simulate;

pub use config::Config;
pub use model::{Coordinate, TemperaturePoint, TemperatureSeries};
pub use object::ObjectMetadata;
pub use provider::{ResolverError, TemperatureProvider, power::PowerProvider};
