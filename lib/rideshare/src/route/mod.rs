use std::fmt;

use crate::data::trips::*;

pub mod tree;
pub use tree::{RouteTree, NodeIdx};

/// Where a trip stands in a route snapshot.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EventState {
  PendingPickup,
  PendingDropoff,
  Completed,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EventKind {
  Root,
  Pickup,
  Dropoff,
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      EventKind::Root => "Start",
      EventKind::Pickup => "Pickup",
      EventKind::Dropoff => "Dropoff",
    })
  }
}

/// State of every trip of a block at one route node, indexed by block-local
/// trip index. `None` marks a trip that this route does not consider at all.
///
/// Each node owns its own copy; branching goes through [`RouteOptions::with`].
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct RouteOptions(Vec<Option<EventState>>);

impl RouteOptions {
  /// All `n` trips awaiting pickup.
  pub fn all_pending(n: usize) -> Self {
    RouteOptions(vec![Some(EventState::PendingPickup); n])
  }

  /// Only the trips in `pending` (block-local indices) awaiting pickup; the rest are absent.
  pub fn pending(n: usize, pending: impl IntoIterator<Item=usize>) -> Self {
    let mut states = vec![None; n];
    for i in pending {
      states[i] = Some(EventState::PendingPickup);
    }
    RouteOptions(states)
  }

  /// Copy of `self` with trip `i` moved to `state`.
  #[must_use]
  pub fn with(&self, i: usize, state: EventState) -> Self {
    let mut new = self.clone();
    new.0[i] = Some(state);
    new
  }

  #[inline]
  pub fn get(&self, i: usize) -> Option<EventState> {
    self.0.get(i).copied().flatten()
  }

  pub fn iter<'a>(&'a self) -> impl Iterator<Item=(usize, EventState)> + 'a {
    self.0.iter()
      .enumerate()
      .filter_map(|(i, s)| s.map(|s| (i, s)))
  }

  fn with_state<'a>(&'a self, state: EventState) -> impl Iterator<Item=usize> + 'a {
    self.iter().filter(move |&(_, s)| s == state).map(|(i, _)| i)
  }

  /// Trips currently on board.
  pub fn in_vehicle<'a>(&'a self) -> impl Iterator<Item=usize> + 'a {
    self.with_state(EventState::PendingDropoff)
  }

  pub fn has_pending_dropoff(&self) -> bool {
    self.in_vehicle().next().is_some()
  }

  pub fn pending_pickups(&self) -> Vec<usize> {
    self.with_state(EventState::PendingPickup).collect()
  }

  /// Number of trips this snapshot considers.
  pub fn len(&self) -> usize {
    self.0.iter().filter(|s| s.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Debug for RouteOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map()
      .entries(self.iter())
      .finish()
  }
}

/// One event of a partial route, stored in a [`RouteTree`] arena.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteNode {
  /// Block-local trip index; `None` only at the root.
  pub trip: Option<usize>,
  pub kind: EventKind,
  /// `None` for the root of a fresh vehicle, which has no position yet.
  pub loc: Option<Point>,
  pub time: Time,
  pub load: Demand,
  /// Number of ancestors.
  pub stops: usize,
  pub options: RouteOptions,
  pub parent: Option<NodeIdx>,
}

impl RouteNode {
  /// Elapsed time carries on from `continuation`, so clocks keep running across blocks.
  pub fn root(options: RouteOptions, continuation: Option<&RouteEvent>) -> Self {
    RouteNode {
      trip: None,
      kind: EventKind::Root,
      loc: continuation.and_then(|e| e.loc),
      time: continuation.map_or(0.0, |e| e.time),
      load: 0,
      stops: 0,
      options,
      parent: None,
    }
  }

  /// Matrix location of this event.
  pub fn site(&self, locs: &impl BlockLocs) -> Option<Loc> {
    match (self.kind, self.trip) {
      (EventKind::Pickup, Some(i)) => Some(locs.pickup_loc(i)),
      (EventKind::Dropoff, Some(i)) => Some(locs.dropoff_loc(i)),
      _ => None,
    }
  }
}

/// A route event detached from its tree, with the trip's real id.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEvent {
  pub trip: Option<TripId>,
  pub kind: EventKind,
  pub loc: Option<Point>,
  pub time: Time,
  pub load: Demand,
}

/// One vehicle's itinerary within a block, root event first.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRoute {
  pub events: Vec<RouteEvent>,
}

impl VehicleRoute {
  /// Pickups and dropoffs, i.e. events after the root.
  pub fn stops(&self) -> &[RouteEvent] {
    match self.events.split_first() {
      Some((_, rest)) => rest,
      None => &[],
    }
  }

  pub fn final_event(&self) -> Option<&RouteEvent> {
    self.events.last()
  }

  pub fn total_time(&self) -> Time {
    self.final_event().map_or(0.0, |e| e.time)
  }

  /// Trips served by this vehicle, in pickup order.
  pub fn trips(&self) -> Vec<TripId> {
    self.events.iter()
      .filter(|e| e.kind == EventKind::Pickup)
      .filter_map(|e| e.trip)
      .collect()
  }
}
