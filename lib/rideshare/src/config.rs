use crate::{Error, Result};
use crate::data::trips::Demand;
use crate::travel::EuclideanTravelTime;

/// Solver settings; the defaults are a three-seat car on a 5 px/km map at 1 km/min.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
  pub capacity: Demand,
  pub travel: EuclideanTravelTime,
}

impl Default for SolverConfig {
  fn default() -> Self {
    SolverConfig { capacity: 3, travel: EuclideanTravelTime::default() }
  }
}

impl SolverConfig {
  pub fn validate(&self) -> Result<()> {
    validate_capacity(self.capacity)?;
    let EuclideanTravelTime { pixel_per_km, avg_speed_per_min } = self.travel;
    if !(pixel_per_km > 0.0 && avg_speed_per_min > 0.0) {
      return Err(Error::InvalidTravelSpeed { pixel_per_km, avg_speed_per_min });
    }
    Ok(())
  }
}

pub(crate) fn validate_capacity(capacity: Demand) -> Result<()> {
  if capacity <= 0 {
    return Err(Error::InvalidCapacity(capacity));
  }
  Ok(())
}
