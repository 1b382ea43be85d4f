//! Hexagonal lattice coordinates.
//!
//! Chips are addressed by a 2D position (x, y) where X points left-to-right
//! and Y points bottom-to-top. The diagonal link of the hexagonal lattice is
//! a third axis Z pointing from top-right to bottom-left, so a path through
//! the mesh is naturally a 3-axis [`RoutingVector`]. That redundant form only
//! exists for path arithmetic: positions themselves are always 2D.
//!
//! The vector (1, 1, 1) moves nowhere, so any multiple of it may be added to a
//! routing vector without changing the destination it reaches.

use std::ops::{Add, Neg, Sub};

use crate::Direction;

/// A chip position in the reduced 2D hexagonal lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Column, left-to-right
    pub x: i64,
    /// Row, bottom-to-top
    pub y: i64,
}

impl Position {
    /// Origin of the lattice.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Create a new position.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one link away in `direction`.
    ///
    /// `Direction::Local` returns the position itself.
    pub fn step(self, direction: Direction) -> Self {
        (RoutingVector::from(self) + direction).reduce()
    }

    /// All six neighbouring positions, in [`Direction::LINKS`] order.
    pub fn neighbors(self) -> [Self; 6] {
        Direction::LINKS.map(|d| self.step(d))
    }
}

impl Add for Position {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(i64, i64)> for Position {
    fn from((x, y): (i64, i64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A path through the mesh in redundant 3-axis (cube) form.
///
/// A shortest-path vector has at least one zero component and its other two
/// components (if nonzero) have opposite signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingVector {
    /// East (+) / west (-) hops
    pub x: i64,
    /// North (+) / south (-) hops
    pub y: i64,
    /// South-west (+) / north-east (-) hops
    pub z: i64,
}

impl RoutingVector {
    /// The empty path.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new vector.
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Build a vector from up to three components, zero-filling the rest.
    ///
    /// Components beyond the third are ignored.
    pub fn zero_pad(components: &[i64]) -> Self {
        let mut padded = [0i64; 3];
        for (slot, value) in padded.iter_mut().zip(components) {
            *slot = *value;
        }
        Self::new(padded[0], padded[1], padded[2])
    }

    /// Fold the Z component into X and Y, giving the position this vector
    /// reaches from the origin.
    pub const fn reduce(self) -> Position {
        Position::new(self.x - self.z, self.y - self.z)
    }

    /// Number of hops needed to traverse this vector.
    pub const fn manhattan(self) -> u64 {
        self.x.unsigned_abs() + self.y.unsigned_abs() + self.z.unsigned_abs()
    }

    /// Whether this vector goes nowhere.
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }

    /// Number of nonzero components.
    pub fn nonzero_axes(self) -> usize {
        [self.x, self.y, self.z].iter().filter(|c| **c != 0).count()
    }

    /// The unique minimal-magnitude equivalent of this vector.
    ///
    /// Subtracting the median component from every component leaves one axis
    /// at zero and the other two with opposite signs.
    pub fn minimise(self) -> Self {
        let median = median(self.x, self.y, self.z);
        Self::new(self.x - median, self.y - median, self.z - median)
    }

    /// Whether this vector is already in shortest-path form.
    pub fn is_shortest_path(self) -> bool {
        self.minimise() == self
    }
}

fn median(a: i64, b: i64, c: i64) -> i64 {
    a.max(b).min(a.min(b).max(c))
}

impl From<Position> for RoutingVector {
    fn from(p: Position) -> Self {
        Self::new(p.x, p.y, 0)
    }
}

impl Add for RoutingVector {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Add<Direction> for RoutingVector {
    type Output = Self;

    #[inline]
    fn add(self, direction: Direction) -> Self {
        self + direction.unit()
    }
}

impl Sub for RoutingVector {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for RoutingVector {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for RoutingVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
