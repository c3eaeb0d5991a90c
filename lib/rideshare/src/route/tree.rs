use tracing::*;

use crate::data::trips::*;
use crate::data::context::BlockContext;
use super::*;

pub type NodeIdx = usize;

pub const ROOT: NodeIdx = 0;

/// Every feasible partial route reachable from one root, as an arena of
/// nodes linked to their predecessors.
#[derive(Debug, Clone)]
pub struct RouteTree {
  nodes: Vec<RouteNode>,
  leaves: Vec<NodeIdx>,
  pruned: Vec<RouteNode>,
}

/// A node is late if its own dropoff misses the deadline, or anyone still on
/// board can no longer arrive in time.
pub fn is_late(ctx: &BlockContext, node: &RouteNode) -> bool {
  if let (EventKind::Dropoff, Some(i)) = (node.kind, node.trip) {
    if node.time > ctx.trip(i).arrive_before {
      return true;
    }
  }
  node.options.in_vehicle().any(|j| node.time > ctx.trip(j).arrive_before)
}

impl RouteTree {
  /// Expand `options` exhaustively. With a `continuation`, the vehicle starts
  /// where and when that event left it, and the legs out of the root use the
  /// direct travel time instead of the block matrix.
  #[instrument(level = "debug", name = "route_tree", skip(ctx, options, continuation), fields(block = ctx.index, trips = options.len()))]
  pub fn build(ctx: &BlockContext, options: RouteOptions, continuation: Option<&RouteEvent>) -> RouteTree {
    let mut tree = RouteTree {
      nodes: vec![RouteNode::root(options, continuation)],
      leaves: Vec::new(),
      pruned: Vec::new(),
    };
    let entry = continuation.and_then(|e| e.loc);

    // children are pushed in reverse, so nodes are visited in depth-first order
    let mut stack = vec![ROOT];
    while let Some(idx) = stack.pop() {
      let children = tree.expand(ctx, idx, if idx == ROOT { entry } else { None });
      let mut survivors = Vec::with_capacity(children.len());
      for child in children {
        if is_late(ctx, &child) {
          trace!(parent = idx, trip = ?child.trip, kind = ?child.kind, time = child.time, "late");
          tree.pruned.push(child);
        } else {
          survivors.push(tree.push(child));
        }
      }

      if survivors.is_empty() {
        if !tree.nodes[idx].options.has_pending_dropoff() {
          trace!(idx, stops = tree.nodes[idx].stops, time = tree.nodes[idx].time, "leaf");
          tree.leaves.push(idx);
        }
      } else {
        stack.extend(survivors.into_iter().rev());
      }
    }

    debug!(nodes = tree.nodes.len(), leaves = tree.leaves.len(), pruned = tree.pruned.len(), "route tree built");
    tree
  }

  fn push(&mut self, node: RouteNode) -> NodeIdx {
    self.nodes.push(node);
    self.nodes.len() - 1
  }

  /// All children of `idx`, late ones included.
  fn expand(&self, ctx: &BlockContext, idx: NodeIdx, entry: Option<Point>) -> Vec<RouteNode> {
    let node = &self.nodes[idx];
    let from = node.site(ctx);
    let mut children = Vec::new();

    for (i, state) in node.options.iter() {
      let trip = ctx.trip(i);
      match state {
        EventState::PendingPickup if node.load < ctx.capacity => {
          let tt = match entry {
            Some(p) => ctx.direct_time(p, trip.origin),
            None => ctx.leg_time(from, ctx.pickup_loc(i)),
          };
          let mut time = node.time + tt;
          if time < trip.depart_after {
            time = trip.depart_after;
          }
          children.push(RouteNode {
            trip: Some(i),
            kind: EventKind::Pickup,
            loc: Some(trip.origin),
            time,
            load: node.load + 1,
            stops: node.stops + 1,
            options: node.options.with(i, EventState::PendingDropoff),
            parent: Some(idx),
          });
        }
        EventState::PendingDropoff => {
          let tt = ctx.leg_time(from, ctx.dropoff_loc(i));
          children.push(RouteNode {
            trip: Some(i),
            kind: EventKind::Dropoff,
            loc: Some(trip.destination),
            time: node.time + tt,
            load: node.load - 1,
            stops: node.stops + 1,
            options: node.options.with(i, EventState::Completed),
            parent: Some(idx),
          });
        }
        _ => {}
      }
    }
    children
  }

  pub fn root(&self) -> &RouteNode {
    &self.nodes[ROOT]
  }

  #[inline]
  pub fn node(&self, idx: NodeIdx) -> &RouteNode {
    &self.nodes[idx]
  }

  pub fn len(&self) -> usize { self.nodes.len() }

  pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

  /// Leaves in the order they were reached.
  pub fn leaves(&self) -> &[NodeIdx] {
    &self.leaves
  }

  /// Nodes that were discarded as late, detached from the tree.
  pub fn pruned(&self) -> &[RouteNode] {
    &self.pruned
  }

  /// Node indices from the root down to `idx`.
  pub fn path(&self, idx: NodeIdx) -> Vec<NodeIdx> {
    let mut path = Vec::with_capacity(self.nodes[idx].stops + 1);
    let mut cur = Some(idx);
    while let Some(k) = cur {
      path.push(k);
      cur = self.nodes[k].parent;
    }
    path.reverse();
    path
  }

  pub fn vehicle_route(&self, ctx: &BlockContext, idx: NodeIdx) -> VehicleRoute {
    let events = self.path(idx).into_iter()
      .map(|k| {
        let n = &self.nodes[k];
        RouteEvent {
          trip: n.trip.map(|i| ctx.trip(i).id),
          kind: n.kind,
          loc: n.loc,
          time: n.time,
          load: n.load,
        }
      })
      .collect();
    VehicleRoute { events }
  }
}
