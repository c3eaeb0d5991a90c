use chrono::NaiveDateTime;

pub type Coord = (f64, f64);

/// One line of a trip file, before conversion onto the minutes timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
  pub requester: String,
  pub trip_id: usize,
  pub depart_after: NaiveDateTime,
  pub arrive_before: NaiveDateTime,
  pub origin: Coord,
  pub destination: Coord,
}

/// All records of a trip file, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
  pub records: Vec<TripRecord>,
}
