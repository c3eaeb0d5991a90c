pub use instances::dataset::trips::{
  Time,
  TripId,
  Point,
  TripRequest,
  TripSet,
  sort_trips,
};

/// Passenger count; signed so that misconfigured capacities can be reported.
pub type Demand = i32;
/// Index into a block's travel matrix.
pub type Loc = usize;

/// Travel-matrix layout for a block of `n` trips: trip `i` (block-local) is
/// picked up at location `i` and dropped off at location `i + n`.
pub trait BlockLocs {
  fn n(&self) -> usize;

  #[inline]
  fn pickup_loc(&self, i: usize) -> Loc {
    debug_assert!(i < self.n());
    return i;
  }

  #[inline]
  fn dropoff_loc(&self, i: usize) -> Loc {
    debug_assert!(i < self.n());
    return i + self.n();
  }

  #[inline]
  fn is_pickup(&self, loc: Loc) -> bool {
    return loc < self.n();
  }

  #[inline]
  fn trip_of(&self, loc: Loc) -> usize {
    if self.is_pickup(loc) {
      loc
    } else {
      debug_assert!(loc < 2 * self.n());
      loc - self.n()
    }
  }
}
