//! Hexagonal board regions.
//!
//! A board is a layered hexagon of chips grown ring by ring around the
//! origin. Ring `n` walks six straight segments of lengths
//! `(n, n, n+1, n, n+1, n+1)` along -Y, +Z, -X, +Y, -Z, +X in cube form, so
//! each ring adds `6n + 3` chips and a hexagon of `L` layers holds `3L²`.
//!
//! ```text
//!         # # # #
//!       # # # # #
//!     # # # # # #
//!   # # # # # # #
//! # # # # 0 # # #
//! # # # # # # #
//! # # # # # #
//! # # # # #
//! ```

use crate::{Position, RoutingVector};

/// Total number of chips in a hexagon of `layers` layers.
#[inline]
pub const fn hexagon_node_count(layers: u32) -> u64 {
    3 * (layers as u64) * (layers as u64)
}

/// Number of chips contributed by ring `ring`.
#[inline]
pub const fn hexagon_ring_size(ring: u32) -> u64 {
    6 * ring as u64 + 3
}

/// Segment steps of each ring in cube form, paired with the extra length
/// added to the ring number.
const SEGMENTS: [(RoutingVector, u32); 6] = [
    (RoutingVector::new(0, -1, 0), 0),
    (RoutingVector::new(0, 0, 1), 0),
    (RoutingVector::new(-1, 0, 0), 1),
    (RoutingVector::new(0, 1, 0), 0),
    (RoutingVector::new(0, 0, -1), 1),
    (RoutingVector::new(1, 0, 0), 1),
];

/// Iterator over the positions of a layered hexagon, centre first.
///
/// A clone continues from the same point; call [`hexagon`] again for a
/// fresh pass.
#[derive(Debug, Clone)]
pub struct Hexagon {
    layers: u32,
    ring: u32,
    segment: usize,
    step: u32,
    cursor: RoutingVector,
    remaining: u64,
}

impl Hexagon {
    /// A hexagon with the given number of layers.
    pub fn new(layers: u32) -> Self {
        Self {
            layers,
            ring: 0,
            segment: 0,
            step: 0,
            cursor: RoutingVector::ZERO,
            remaining: hexagon_node_count(layers),
        }
    }

    /// Number of layers in this hexagon.
    pub fn layers(&self) -> u32 {
        self.layers
    }

    fn segment_len(&self) -> u32 {
        self.ring + SEGMENTS[self.segment].1
    }

    /// Move to the next segment (and ring) that still has steps left.
    fn settle(&mut self) {
        while self.ring < self.layers && self.step >= self.segment_len() {
            self.step = 0;
            self.segment += 1;
            if self.segment == SEGMENTS.len() {
                self.segment = 0;
                self.ring += 1;
            }
        }
    }
}

impl Iterator for Hexagon {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        self.settle();
        if self.ring >= self.layers {
            return None;
        }

        let here = self.cursor.reduce();
        self.cursor = self.cursor + SEGMENTS[self.segment].0;
        self.step += 1;
        self.remaining -= 1;
        Some(here)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Hexagon {}

/// Positions of a `layers`-layer hexagon centred on the origin.
pub fn hexagon(layers: u32) -> Hexagon {
    Hexagon::new(layers)
}

/// Whether `offset` (relative to a hexagon's centre) lies inside it.
pub fn in_hexagon(offset: Position, layers: u32) -> bool {
    hexagon(layers).any(|p| p == offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn node_count_formula() {
        assert_eq!(hexagon_node_count(0), 0);
        assert_eq!(hexagon_node_count(1), 3);
        assert_eq!(hexagon_node_count(2), 12);
        assert_eq!(hexagon_node_count(4), 48);
        for layers in 0..6 {
            let by_rings: u64 = (0..layers).map(hexagon_ring_size).sum();
            assert_eq!(by_rings, hexagon_node_count(layers));
        }
    }

    #[test]
    fn four_layers_is_a_board() {
        let points: Vec<_> = hexagon(4).collect();
        assert_eq!(points.len(), 48);
        let unique: HashSet<_> = points.iter().copied().collect();
        assert_eq!(unique.len(), 48);
    }

    #[test]
    fn centre_comes_first() {
        assert_eq!(hexagon(4).next(), Some(Position::ORIGIN));
        assert_eq!(hexagon(0).next(), None);
    }

    #[test]
    fn single_layer_is_the_centre_triangle() {
        let points: Vec<_> = hexagon(1).collect();
        assert_eq!(
            points,
            vec![Position::ORIGIN, Position::new(-1, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn rings_follow_segment_order() {
        let points: Vec<_> = hexagon(2).collect();
        assert_eq!(
            points,
            vec![
                Position::new(0, 0),
                Position::new(-1, 0),
                Position::new(0, 1),
                Position::new(1, 1),
                Position::new(1, 0),
                Position::new(0, -1),
                Position::new(-1, -1),
                Position::new(-2, -1),
                Position::new(-2, 0),
                Position::new(-1, 1),
                Position::new(0, 2),
                Position::new(1, 2),
            ]
        );
    }

    #[test]
    fn board_extent() {
        let points: Vec<_> = hexagon(4).collect();
        assert_eq!(points.iter().map(|p| p.x).min(), Some(-4));
        assert_eq!(points.iter().map(|p| p.x).max(), Some(3));
        assert_eq!(points.iter().map(|p| p.y).min(), Some(-3));
        assert_eq!(points.iter().map(|p| p.y).max(), Some(4));
    }

    #[test]
    fn fresh_iterators_restart() {
        let first: Vec<_> = hexagon(3).collect();
        let second: Vec<_> = hexagon(3).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_is_exact() {
        let mut it = hexagon(4);
        assert_eq!(it.len(), 48);
        it.next();
        it.next();
        assert_eq!(it.len(), 46);
        assert_eq!(it.count(), 46);
    }

    #[test]
    fn membership() {
        assert!(in_hexagon(Position::ORIGIN, 4));
        assert!(in_hexagon(Position::new(-4, -3), 4));
        assert!(in_hexagon(Position::new(3, 4), 4));
        assert!(!in_hexagon(Position::new(4, 0), 4));
        assert!(!in_hexagon(Position::new(-4, 1), 4));
    }
}
