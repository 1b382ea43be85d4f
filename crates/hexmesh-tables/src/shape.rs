//! The shape of a system: which chips of its bounding box exist, and how
//! packets are routed between them.
//!
//! A torus uses every chip of its rectangle and routes with wraparound. A
//! board only populates the 48-chip hexagon centred on (4, 3) and routes
//! without wraparound, since a lone board has no links across its edges.

use std::str::FromStr;

use hexmesh_topology::{
    in_hexagon, route_direction, to_shortest_path_cube, Bounds, Direction, Position, BOARD_CENTRE,
    BOARD_LAYERS,
};

use crate::{ConfigError, Error, Result};

/// Smallest bounding box that holds a board.
pub const MIN_BOARD_SIZE: u32 = 8;

/// The two kinds of system shape, without dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ShapeKind {
    Torus,
    Board,
}

impl ShapeKind {
    /// Give this shape dimensions.
    pub fn with_size(self, width: u32, height: u32) -> Result<SystemShape> {
        match self {
            Self::Torus => SystemShape::torus(width, height),
            Self::Board => SystemShape::board(width, height),
        }
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "torus" => Ok(Self::Torus),
            "board" => Ok(Self::Board),
            _ => Err(ConfigError::UnknownShape(s.to_string()).into()),
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Torus => "torus",
            Self::Board => "board",
        })
    }
}

/// A system's shape and bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "shape", rename_all = "lowercase"))]
pub enum SystemShape {
    /// Every chip of the rectangle is present and edges wrap around.
    Torus { width: u32, height: u32 },
    /// Only the board hexagon is present; no wraparound.
    Board { width: u32, height: u32 },
}

impl SystemShape {
    /// A `width × height` torus.
    pub fn torus(width: u32, height: u32) -> Result<Self> {
        let shape = Self::Torus { width, height };
        shape.validate()?;
        Ok(shape)
    }

    /// A single board in a `width × height` bounding box (at least 8×8).
    pub fn board(width: u32, height: u32) -> Result<Self> {
        let shape = Self::Board { width, height };
        shape.validate()?;
        Ok(shape)
    }

    /// Check the dimensions suit the shape.
    pub fn validate(&self) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptySystem { width, height }.into());
        }
        if self.kind() == ShapeKind::Board && (width < MIN_BOARD_SIZE || height < MIN_BOARD_SIZE) {
            return Err(ConfigError::BoardTooSmall { width, height }.into());
        }
        Ok(())
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Torus { .. } => ShapeKind::Torus,
            Self::Board { .. } => ShapeKind::Board,
        }
    }

    pub fn width(&self) -> u32 {
        match *self {
            Self::Torus { width, .. } | Self::Board { width, .. } => width,
        }
    }

    pub fn height(&self) -> u32 {
        match *self {
            Self::Torus { height, .. } | Self::Board { height, .. } => height,
        }
    }

    /// Chips in the bounding box, present or not.
    pub fn num_chips(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Wraparound bounds for routing.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width() as i64, self.height() as i64)
    }

    /// Whether `pos` lies inside the bounding box.
    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width() as i64).contains(&pos.x) && (0..self.height() as i64).contains(&pos.y)
    }

    /// Whether a chip exists at `pos`.
    pub fn is_active(&self, pos: Position) -> bool {
        if !self.contains(pos) {
            return false;
        }
        match self {
            Self::Torus { .. } => true,
            Self::Board { .. } => in_hexagon(pos - BOARD_CENTRE, BOARD_LAYERS),
        }
    }

    /// Row-major index of `pos` (x fastest).
    pub fn index_of(&self, pos: Position) -> usize {
        pos.y as usize * self.width() as usize + pos.x as usize
    }

    /// Position at row-major `index`.
    pub fn position_at(&self, index: usize) -> Position {
        let width = self.width() as usize;
        Position::new((index % width) as i64, (index / width) as i64)
    }

    /// Every position of the bounding box, row by row from the bottom.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (width, height) = (self.width() as i64, self.height() as i64);
        (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Every chip that exists, in row-major order.
    pub fn active_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |p| self.is_active(*p))
    }

    /// Number of chips that exist.
    pub fn active_count(&self) -> usize {
        self.active_positions().count()
    }

    /// The position after `pos` in row-major order, wrapping at the top.
    fn successor(&self, pos: Position) -> Position {
        let mut x = pos.x + 1;
        let mut y = pos.y;
        if x >= self.width() as i64 {
            x = 0;
            y += 1;
        }
        if y >= self.height() as i64 {
            y = 0;
        }
        Position::new(x, y)
    }

    /// The next chip after `pos` going left-to-right, bottom-to-top.
    ///
    /// Skips absent chips. If no other chip exists this comes back round to
    /// `pos`.
    pub fn next_active(&self, pos: Position) -> Position {
        let mut next = pos;
        for _ in 0..self.num_chips() {
            next = self.successor(next);
            if self.is_active(next) {
                return next;
            }
        }
        pos
    }

    /// Direction a packet leaves `source` in to reach `destination`.
    pub fn route(&self, source: Position, destination: Position) -> Direction {
        match self {
            Self::Torus { .. } => route_direction(source, destination, Some(self.bounds())),
            Self::Board { .. } => Direction::of_vector(to_shortest_path_cube(destination - source)),
        }
    }
}

impl std::fmt::Display for SystemShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width(), self.height(), self.kind())
    }
}
