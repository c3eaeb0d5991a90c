//! Point-to-point travel times and the per-block travel matrix.
use itertools::Itertools;
use tracing::*;
use instances::raw::metrics::{Euclidean, Metric};

use crate::Map;
use crate::data::trips::*;

/// Injected travel-time model.
pub trait TravelTime {
  fn travel_time(&self, from: Point, to: Point) -> Time;
}

/// Straight-line travel on a pixel grid: `distance / pixel_per_km / avg_speed_per_min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EuclideanTravelTime {
  pub pixel_per_km: f64,
  /// km per minute
  pub avg_speed_per_min: f64,
}

impl Default for EuclideanTravelTime {
  fn default() -> Self {
    EuclideanTravelTime { pixel_per_km: 5.0, avg_speed_per_min: 1.0 }
  }
}

impl TravelTime for EuclideanTravelTime {
  #[inline]
  fn travel_time(&self, from: Point, to: Point) -> Time {
    Euclidean::compute(from, to) / self.pixel_per_km / self.avg_speed_per_min
  }
}

impl<F: Fn(Point, Point) -> Time> TravelTime for F {
  #[inline]
  fn travel_time(&self, from: Point, to: Point) -> Time {
    self(from, to)
  }
}

/// Travel time between every pair of pickup and dropoff locations of one
/// block, laid out as described by [`BlockLocs`]. Read-only once built.
#[derive(Debug, Clone)]
pub struct TimeMatrix {
  n: usize,
  travel_time: Map<(Loc, Loc), Time>,
}

impl BlockLocs for TimeMatrix {
  #[inline]
  fn n(&self) -> usize { self.n }
}

impl TimeMatrix {
  pub fn build(trips: &[TripRequest], travel: &dyn TravelTime) -> Self {
    let n = trips.len();
    let mut matrix = TimeMatrix { n, travel_time: Map::default() };
    let point = |m: &TimeMatrix, loc: Loc| {
      let t = &trips[m.trip_of(loc)];
      if m.is_pickup(loc) { t.origin } else { t.destination }
    };

    let travel_time: Map<_, _> = (0..2 * n)
      .cartesian_product(0..2 * n)
      .map(|(i, j)| ((i, j), travel.travel_time(point(&matrix, i), point(&matrix, j))))
      .collect();
    trace!(locations = 2 * n, "travel matrix built");
    matrix.travel_time = travel_time;
    matrix
  }

  /// # Panics
  /// If either location is outside the block.
  #[inline]
  pub fn get(&self, i: Loc, j: Loc) -> Time {
    match self.travel_time.get(&(i, j)) {
      Some(&t) => t,
      None => {
        error!(i, j, n = self.n, "no such arc");
        panic!("bug - arc ({}, {}) is outside the block", i, j)
      }
    }
  }

  pub fn len(&self) -> usize { self.travel_time.len() }

  pub fn is_empty(&self) -> bool { self.travel_time.is_empty() }
}
