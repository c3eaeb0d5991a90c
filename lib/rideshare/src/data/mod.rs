use anyhow::Result;
use std::path::Path;

pub mod trips;
pub mod context;

pub fn get_trip_set(path: impl AsRef<Path>) -> Result<trips::TripSet> {
  instances::dataset::load_trips(path)
}
