//! Temperature inventory: walks Chassis -> Thermal / ThermalSubsystem and collects readings.

pub mod error;
pub mod fetcher;
pub mod types;

pub use fetcher::fetch_temperatures;
