//! Splitting trips into independent time blocks and solving them in order.
use std::ops::Range;
use itertools::Itertools;
use tracing::*;

use crate::{Error, Result, Set, SolverConfig};
use crate::config::validate_capacity;
use crate::data::trips::*;
use crate::data::context::BlockContext;
use crate::travel::TravelTime;
use crate::route::VehicleRoute;
use crate::assign::assign_vehicles;

/// Split trips sorted by `(depart_after, arrive_before)` into blocks. A block
/// ends wherever a trip must arrive before the next one may depart.
pub fn partition_blocks(trips: &[TripRequest]) -> Vec<Range<usize>> {
  if trips.is_empty() {
    return Vec::new();
  }
  let mut starts = vec![0];
  for (i, (a, b)) in trips.iter().tuple_windows().enumerate() {
    debug_assert!(a.depart_after <= b.depart_after);
    if a.arrive_before < b.depart_after {
      starts.push(i + 1);
    }
  }
  starts.push(trips.len());
  starts.into_iter().tuple_windows().map(|(s, e)| s..e).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSchedule {
  /// Trip ids, in time order.
  pub trips: Vec<TripId>,
  /// In assignment order; vehicle `v` continues vehicle `v` of the previous block.
  pub vehicles: Vec<VehicleRoute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
  pub blocks: Vec<BlockSchedule>,
}

impl Schedule {
  /// Fleet size: the most vehicles any block needs.
  pub fn num_vehicles(&self) -> usize {
    self.blocks.iter().map(|b| b.vehicles.len()).max().unwrap_or(0)
  }

  /// Per physical vehicle, its route in each block it drives in, in block order.
  pub fn itineraries(&self) -> Vec<Vec<&VehicleRoute>> {
    (0..self.num_vehicles())
      .map(|v| self.blocks.iter().filter_map(|b| b.vehicles.get(v)).collect())
      .collect()
  }
}

/// Solve with the Euclidean travel model from `config`.
pub fn solve(trips: &[TripRequest], config: &SolverConfig) -> Result<Schedule> {
  config.validate()?;
  solve_with(trips, config.capacity, &config.travel)
}

/// Partition `trips` into blocks and assign vehicles block by block, carrying
/// each block's vehicles into the next.
#[instrument(level = "info", skip(trips, travel), fields(trips = trips.len()))]
pub fn solve_with(trips: &[TripRequest], capacity: Demand, travel: &dyn TravelTime) -> Result<Schedule> {
  validate_capacity(capacity)?;
  if trips.is_empty() {
    return Err(Error::EmptyTripSet);
  }
  let mut seen = Set::default();
  if let Some(dup) = trips.iter().find(|t| !seen.insert(t.id)) {
    return Err(Error::DuplicateTrip(dup.id));
  }

  let mut trips = trips.to_vec();
  sort_trips(&mut trips);
  let trips = trips;

  let ranges = partition_blocks(&trips);
  info!(blocks = ranges.len(), "partitioned trips");

  let mut blocks: Vec<BlockSchedule> = Vec::with_capacity(ranges.len());
  for (b, range) in ranges.into_iter().enumerate() {
    let _s = info_span!("block", b).entered();
    let ctx = BlockContext::new(b, &trips[range], capacity, travel);
    let previous = blocks.last().map_or(&[][..], |prev| &prev.vehicles[..]);
    let vehicles = assign_vehicles(&ctx, previous)?;
    info!(trips = ctx.len(), vehicles = vehicles.len(), "block solved");
    blocks.push(BlockSchedule {
      trips: ctx.trips.iter().map(|t| t.id).collect(),
      vehicles,
    });
  }

  let schedule = Schedule { blocks };
  info!(vehicles = schedule.num_vehicles(), "schedule complete");
  Ok(schedule)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::init_test_logging;
  use crate::route::EventKind;
  use crate::test_utils::*;
  use crate::travel::EuclideanTravelTime;
  use crate::data::get_trip_set;

  fn windows(spans: &[(f64, f64)]) -> Vec<TripRequest> {
    spans.iter()
      .enumerate()
      .map(|(k, &(d, a))| trip(k + 1, (0.0, 0.0), (1.0, 0.0), d, a))
      .collect()
  }

  #[test]
  fn partition() {
    assert!(partition_blocks(&[]).is_empty());
    assert_eq!(partition_blocks(&windows(&[(0.0, 10.0)])), vec![0..1]);
    let trips = windows(&[(0.0, 10.0), (5.0, 20.0), (25.0, 40.0), (41.0, 50.0), (45.0, 60.0)]);
    assert_eq!(partition_blocks(&trips), vec![0..2, 2..3, 3..5]);
    // touching windows stay together
    assert_eq!(partition_blocks(&windows(&[(0.0, 10.0), (10.0, 20.0)])), vec![0..2]);
  }

  #[test]
  fn partition_only_compares_neighbours() {
    // the first trip outlasts the third, but only adjacent pairs decide
    let trips = windows(&[(0.0, 100.0), (1.0, 2.0), (50.0, 60.0)]);
    assert_eq!(partition_blocks(&trips), vec![0..2, 2..3]);
  }

  #[test]
  fn fails_fast_on_bad_input() {
    let travel = unit_travel();
    assert_eq!(solve_with(&[], 3, &travel), Err(Error::EmptyTripSet));
    let trips = windows(&[(0.0, 10.0)]);
    assert_eq!(solve_with(&trips, 0, &travel), Err(Error::InvalidCapacity(0)));
    let mut trips = windows(&[(0.0, 10.0), (0.0, 10.0)]);
    trips[1].id = 1;
    assert_eq!(solve_with(&trips, 1, &travel), Err(Error::DuplicateTrip(1)));
  }

  #[test]
  fn vehicles_carry_across_blocks() -> Result<()> {
    init_test_logging(None::<&str>);
    let trips = vec![
      // block 0 needs two single-seat vehicles
      trip(1, (0.0, 0.0), (10.0, 0.0), 0.0, 12.0),
      trip(2, (0.0, 1.0), (10.0, 1.0), 0.0, 12.0),
      // block 1: one trip starting where vehicle 1 parked
      trip(3, (10.0, 0.0), (10.0, 10.0), 30.0, 60.0),
      // block 2: two trips again
      trip(4, (0.0, 0.0), (5.0, 0.0), 100.0, 106.0),
      trip(5, (0.0, 50.0), (5.0, 50.0), 100.0, 106.0),
    ];
    let schedule = solve_with(&trips, 1, &unit_travel())?;
    assert_eq!(schedule.blocks.len(), 3);
    assert_eq!(schedule.blocks.iter().map(|b| b.vehicles.len()).collect_vec(), vec![2, 1, 2]);
    assert_eq!(schedule.num_vehicles(), 2);

    let first = &schedule.blocks[1].vehicles[0];
    assert_eq!(first.events[0].loc, Some((10.0, 0.0)));
    assert_eq!(first.events[0].time, 10.0);
    assert_eq!(first.events[1].time, 30.0);

    // the second vehicle of block 2 has no predecessor in block 1
    assert_eq!(schedule.blocks[2].vehicles[1].events[0].loc, None);

    let itineraries = schedule.itineraries();
    assert_eq!(itineraries.len(), 2);
    assert_eq!(itineraries[0].len(), 3);
    assert_eq!(itineraries[1].len(), 2);
    assert_eq!(itineraries[1].iter().map(|r| r.trips()).collect_vec(), vec![vec![2], vec![5]]);
    Ok(())
  }

  #[test]
  fn fresh_vehicle_covers_for_stranded_one() -> Result<()> {
    let trips = vec![
      trip(1, (0.0, 0.0), (10.0, 0.0), 0.0, 20.0),
      // too far from where vehicle 0 parks, easy for a new vehicle
      trip(2, (500.0, 0.0), (501.0, 0.0), 30.0, 100.0),
    ];
    let schedule = solve_with(&trips, 3, &unit_travel())?;
    assert_eq!(schedule.blocks.len(), 2);
    let block = &schedule.blocks[1];
    assert_eq!(block.vehicles.len(), 2);
    assert!(block.vehicles[0].stops().is_empty());
    assert_eq!(block.vehicles[1].trips(), vec![2]);
    assert_eq!(block.vehicles[1].stops().iter().map(|e| e.time).collect_vec(), vec![30.0, 31.0]);

    let itineraries = schedule.itineraries();
    assert_eq!(itineraries.len(), 2);
    assert_eq!(itineraries[0].iter().map(|r| r.trips()).collect_vec(), vec![vec![1], vec![]]);
    assert_eq!(itineraries[1].len(), 1);
    Ok(())
  }

  #[test]
  fn unsatisfiable_block_propagates() {
    let trips = vec![
      trip(1, (0.0, 0.0), (1.0, 0.0), 0.0, 10.0),
      trip(2, (0.0, 0.0), (50.0, 0.0), 20.0, 40.0),
    ];
    assert_eq!(solve_with(&trips, 2, &unit_travel()),
               Err(Error::UnsatisfiableBlock { block: 1, unserved: vec![2] }));
  }

  #[test]
  fn unsorted_input_is_sorted() -> Result<()> {
    let trips = windows(&[(50.0, 60.0), (0.0, 10.0)]);
    let schedule = solve_with(&trips, 1, &unit_travel())?;
    assert_eq!(schedule.blocks.iter().map(|b| b.trips.clone()).collect_vec(), vec![vec![2], vec![1]]);
    Ok(())
  }

  #[test]
  fn sample_instance() -> anyhow::Result<()> {
    init_test_logging(None::<&str>);
    let set = get_trip_set(concat!(env!("CARGO_MANIFEST_DIR"), "/../instances/data/simpsons.tsv"))?;
    let config = SolverConfig::default();
    let schedule = solve(&set.trips, &config)?;
    assert_eq!(schedule.blocks.len(), 2);
    assert_eq!(schedule.blocks[0].trips, vec![1, 2, 3]);
    assert_eq!(schedule.blocks[0].vehicles.len(), 2);
    assert_eq!(schedule.blocks[0].vehicles[1].trips(), vec![3]);
    assert_eq!(schedule.blocks[1].vehicles.len(), 1);
    let mut served = schedule.blocks[1].vehicles[0].trips();
    served.sort();
    assert_eq!(served, vec![4, 5]);
    assert_eq!(solve(&set.trips, &config)?, schedule);

    for route in schedule.blocks.iter().flat_map(|b| &b.vehicles) {
      assert_eq!(route.events[0].kind, EventKind::Root);
      for e in route.stops() {
        let t = set.trips.iter().find(|t| Some(t.id) == e.trip).unwrap();
        if e.kind == EventKind::Pickup {
          assert!(e.time >= t.depart_after);
        } else {
          assert!(e.time <= t.arrive_before);
        }
      }
    }
    Ok(())
  }

  #[test]
  fn config_errors_before_search() {
    let config = SolverConfig { travel: EuclideanTravelTime { pixel_per_km: 0.0, avg_speed_per_min: 1.0 }, ..SolverConfig::default() };
    assert!(matches!(solve(&windows(&[(0.0, 1.0)]), &config), Err(Error::InvalidTravelSpeed { .. })));
  }
}
