use std::fmt;
use tracing::*;

use crate::Map;
use crate::data::trips::*;
use crate::travel::{TravelTime, TimeMatrix};

/// Everything a block's search needs, passed explicitly through the tree
/// builder and the assigner.
pub struct BlockContext<'a> {
  pub index: usize,
  pub trips: &'a [TripRequest],
  pub capacity: Demand,
  pub matrix: TimeMatrix,
  travel: &'a dyn TravelTime,
  local: Map<TripId, usize>,
}

impl<'a> BlockContext<'a> {
  #[instrument(level = "trace", skip(trips, travel))]
  pub fn new(index: usize, trips: &'a [TripRequest], capacity: Demand, travel: &'a dyn TravelTime) -> Self {
    let matrix = TimeMatrix::build(trips, travel);
    let local = trips.iter().enumerate().map(|(k, t)| (t.id, k)).collect();
    BlockContext { index, trips, capacity, matrix, travel, local }
  }

  pub fn len(&self) -> usize { self.trips.len() }

  pub fn is_empty(&self) -> bool { self.trips.is_empty() }

  #[inline]
  pub fn trip(&self, i: usize) -> &TripRequest {
    &self.trips[i]
  }

  /// Block-local index of a trip.
  ///
  /// # Panics
  /// If `id` is not part of this block; callers only ever hand back ids that
  /// came out of the same block.
  pub fn local_index(&self, id: TripId) -> usize {
    match self.local.get(&id) {
      Some(&k) => k,
      None => {
        error!(id, block = self.index, "trip not in block");
        panic!("bug - trip {} is not part of block {}", id, self.index)
      }
    }
  }

  /// Travel time of a leg inside the block; legs out of a root cost nothing.
  #[inline]
  pub fn leg_time(&self, from: Option<Loc>, to: Loc) -> Time {
    match from {
      Some(from) => self.matrix.get(from, to),
      None => 0.0,
    }
  }

  /// Travel time between arbitrary points, used for legs entering the block.
  #[inline]
  pub fn direct_time(&self, from: Point, to: Point) -> Time {
    self.travel.travel_time(from, to)
  }
}

impl<'a> BlockLocs for BlockContext<'a> {
  #[inline]
  fn n(&self) -> usize { self.trips.len() }
}

impl<'a> fmt::Debug for BlockContext<'a> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BlockContext")
      .field("index", &self.index)
      .field("trips", &self.trips.iter().map(|t| t.id).collect::<Vec<_>>())
      .field("capacity", &self.capacity)
      .finish()
  }
}
