//! Hexmesh Topology
//!
//! Coordinates, directions and shortest paths for a hexagonally-connected
//! chip mesh laid out on a rectangular torus, plus the hexagonal boards that
//! the torus is physically built from.
//!
//! # Addressing
//!
//! Chips have a 2D position (x, y). Each chip links to six neighbours:
//! east/west along X, north/south along Y and north-east/south-west along
//! the diagonal. Paths are expressed in a redundant 3-axis form (see
//! [`RoutingVector`]) where the diagonal is its own axis Z; adding (1, 1, 1)
//! to a path does not change where it ends.
//!
//! # Boards
//!
//! A board is a 4-layer hexagon of 48 chips. Three boards tile a 12×12
//! patch of the torus, and the links crossing each board edge are
//! enumerated by [`hexagon_edge_links`].

mod boundary;
mod coord;
mod direction;
mod hexagon;
mod path;

pub use boundary::{
    board_tile_offsets, hexagon_edge_link, hexagon_edge_links, links_per_edge, tiled_chip_count,
    BoundaryLink, Edge, EdgeSpec,
};
pub use coord::{Position, RoutingVector};
pub use direction::{vector_to_direction, Direction};
pub use hexagon::{hexagon, hexagon_node_count, hexagon_ring_size, in_hexagon, Hexagon};
pub use path::{
    candidates, representations, route_direction, shortest_path, to_shortest_path_cube, wrap,
    Bounds,
};

/// Layers in a physical board.
pub const BOARD_LAYERS: u32 = 4;

/// Chips on a physical board.
pub const BOARD_CHIPS: usize = 48;

/// Position of a board's centre chip within its 8×8 bounding box.
pub const BOARD_CENTRE: Position = Position::new(4, 3);

// Compile-time assertion that a board hexagon holds a board's worth of chips
const _: () = assert!(hexagon_node_count(BOARD_LAYERS) == BOARD_CHIPS as u64);
