//! Shortest paths between chips, with optional toroidal wraparound.
//!
//! On a torus each axis can be crossed directly or by wrapping around the
//! edge, giving four combinations of 2D delta. Each delta has three
//! representations in cube form (one per pair of axes) and the resolver keeps
//! the cheapest of all twelve. Ties go to the earliest candidate, which puts
//! the non-wrapping delta first.

use crate::{Direction, Position, RoutingVector};

/// Width and height of a toroidal mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub width: i64,
    pub height: i64,
}

impl Bounds {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}

impl From<(i64, i64)> for Bounds {
    fn from((width, height): (i64, i64)) -> Self {
        Self::new(width, height)
    }
}

/// The three cube-form representations of a 2D delta.
///
/// Order: X and Z, Y and Z, X and Y. All three reduce to the same position.
pub fn representations(delta: Position) -> [RoutingVector; 3] {
    let Position { x: dx, y: dy } = delta;
    [
        RoutingVector::new(dx - dy, 0, -dy),
        RoutingVector::new(0, dy - dx, -dx),
        RoutingVector::new(dx, dy, 0),
    ]
}

/// Minimal cube-form vector for a delta in a mesh without wraparound.
pub fn to_shortest_path_cube(delta: Position) -> RoutingVector {
    RoutingVector::from(delta).minimise()
}

/// The delta that crosses the mesh edge instead of going directly.
///
/// A zero delta wraps all the way round to `+bound`.
#[inline]
pub const fn wrap(delta: i64, bound: i64) -> i64 {
    if delta > 0 {
        delta - bound
    } else {
        delta + bound
    }
}

/// Every candidate path from `src` to `dst`, in tie-break order.
///
/// Without bounds there are three; with bounds, twelve.
pub fn candidates(src: Position, dst: Position, bounds: Option<Bounds>) -> Vec<RoutingVector> {
    let delta = dst - src;
    match bounds {
        None => representations(delta).to_vec(),
        Some(b) => {
            let xs = [delta.x, wrap(delta.x, b.width)];
            let ys = [delta.y, wrap(delta.y, b.height)];
            xs.iter()
                .flat_map(|&x| ys.iter().map(move |&y| Position::new(x, y)))
                .flat_map(representations)
                .collect()
        }
    }
}

/// The minimal-distance routing vector from `src` to `dst`.
///
/// With `bounds` the mesh is treated as a torus of that size and paths may
/// wrap around either axis. The result always has at least one zero axis.
pub fn shortest_path(src: Position, dst: Position, bounds: Option<Bounds>) -> RoutingVector {
    if src == dst {
        return RoutingVector::ZERO;
    }

    // min_by_key keeps the first of equal minima
    candidates(src, dst, bounds)
        .into_iter()
        .min_by_key(|v| v.manhattan())
        .unwrap_or_default()
}

/// Direction a packet takes at `src` to reach `dst` by a shortest path.
pub fn route_direction(src: Position, dst: Position, bounds: Option<Bounds>) -> Direction {
    Direction::of_vector(shortest_path(src, dst, bounds))
}
