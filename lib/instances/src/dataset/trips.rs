use std::borrow::Cow;
use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::Map;
use crate::raw::{FromRaw, trips::{TripTable, Coord}};

/// Minutes after [`TripSet::time_zero`].
pub type Time = f64;
pub type TripId = usize;
pub type Point = Coord;

/// A single ride request on the common minutes timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
  pub id: TripId,
  pub requester: String,
  pub origin: Point,
  pub destination: Point,
  pub depart_after: Time,
  pub arrive_before: Time,
}

impl TripRequest {
  pub fn new(id: TripId, requester: impl Into<String>, origin: Point, destination: Point, depart_after: Time, arrive_before: Time) -> Self {
    TripRequest { id, requester: requester.into(), origin, destination, depart_after, arrive_before }
  }
}

/// Trip requests sorted by `(depart_after, arrive_before)`, with the wall-clock
/// instant that corresponds to minute zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TripSet {
  pub id: String,
  pub time_zero: NaiveDateTime,
  pub trips: Vec<TripRequest>,
}

pub fn sort_trips(trips: &mut [TripRequest]) {
  trips.sort_by(|a, b| a.depart_after.total_cmp(&b.depart_after)
    .then(a.arrive_before.total_cmp(&b.arrive_before)));
}

impl TripSet {
  pub fn len(&self) -> usize { self.trips.len() }

  pub fn is_empty(&self) -> bool { self.trips.is_empty() }

  pub fn index_by_id(&self) -> Map<TripId, usize> {
    self.trips.iter().enumerate().map(|(k, t)| (t.id, k)).collect()
  }

  pub fn clock_time(&self, t: Time) -> NaiveDateTime {
    self.time_zero + chrono::Duration::microseconds((t * 60_000_000.0).round() as i64)
  }
}

impl FromRaw<TripTable> for TripSet {
  fn from_raw(raw: TripTable, id: Cow<str>) -> TripSet {
    let time_zero = raw.records.iter()
      .map(|r| r.depart_after)
      .min()
      .unwrap_or_default();

    let minutes = |t: NaiveDateTime| (t - time_zero).num_milliseconds() as Time / 60_000.0;

    let mut trips = raw.records.into_iter()
      .map(|r| TripRequest {
        id: r.trip_id,
        requester: r.requester,
        origin: r.origin,
        destination: r.destination,
        depart_after: minutes(r.depart_after),
        arrive_before: minutes(r.arrive_before),
      })
      .collect_vec();
    sort_trips(&mut trips);

    TripSet { id: id.into_owned(), time_zero, trips }
  }
}
