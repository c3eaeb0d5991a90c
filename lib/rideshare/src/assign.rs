//! Greedy vehicle assignment within a block.
//!
//! The leaf with the most stops wins, then the one finishing earliest, then
//! the one the tree search reached first. Trips the winning route never picked
//! up go to the next vehicle, which gets a fresh tree over just those trips.
//! A vehicle carried over from the previous block that is stranded too far
//! away stays idle for the block.
use tracing::*;

use crate::{Error, Result};
use crate::data::trips::TripId;
use crate::data::context::BlockContext;
use crate::route::{RouteTree, RouteOptions, NodeIdx, VehicleRoute};
use crate::route::tree::ROOT;

/// The best leaf of `tree`, or `None` if the tree has no leaves.
pub fn select_best_leaf(tree: &RouteTree) -> Option<NodeIdx> {
  let mut best: Option<NodeIdx> = None;
  for &leaf in tree.leaves() {
    let better = match best {
      None => true,
      Some(b) => {
        let (l, b) = (tree.node(leaf), tree.node(b));
        l.stops > b.stops || (l.stops == b.stops && l.time < b.time)
      }
    };
    if better {
      best = Some(leaf);
    }
  }
  best
}

/// Assign vehicles until every trip of the block is served.
///
/// Vehicle `v` of this block continues from the final event of `previous[v]`
/// (the routes of the preceding block) when there is one. A continued vehicle
/// that cannot serve any pending trip keeps its slot with an idle route, and
/// the same trips are offered to the next vehicle. Only a fresh vehicle that
/// makes no progress fails the block.
#[instrument(level = "debug", skip(ctx, previous), fields(block = ctx.index))]
pub fn assign_vehicles(ctx: &BlockContext, previous: &[VehicleRoute]) -> Result<Vec<VehicleRoute>> {
  let mut pending: Vec<TripId> = ctx.trips.iter().map(|t| t.id).collect();
  let mut vehicles: Vec<VehicleRoute> = Vec::new();

  while !pending.is_empty() {
    let continuation = previous.get(vehicles.len()).and_then(|r| r.final_event());
    let options = RouteOptions::pending(ctx.len(), pending.iter().map(|&id| ctx.local_index(id)));
    let tree = RouteTree::build(ctx, options, continuation);

    let progress = select_best_leaf(&tree).and_then(|best| {
      let leftover: Vec<TripId> = tree.node(best).options.pending_pickups()
        .into_iter()
        .map(|i| ctx.trip(i).id)
        .collect();
      if leftover.len() < pending.len() { Some((best, leftover)) } else { None }
    });

    match progress {
      Some((best, leftover)) => {
        let route = tree.vehicle_route(ctx, best);
        debug!(vehicle = vehicles.len(), continued = continuation.is_some(), served = ?route.trips(), ?leftover, time = route.total_time(), "vehicle assigned");
        vehicles.push(route);
        pending = leftover;
      }
      None if continuation.is_some() => {
        debug!(vehicle = vehicles.len(), ?pending, "continued vehicle cannot serve any trip, idling");
        vehicles.push(tree.vehicle_route(ctx, ROOT));
      }
      None => {
        warn!(block = ctx.index, ?pending, "no feasible route");
        return Err(Error::UnsatisfiableBlock { block: ctx.index, unserved: pending });
      }
    }
  }

  Ok(vehicles)
}
