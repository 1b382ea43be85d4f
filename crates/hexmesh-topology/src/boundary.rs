//! Links that leave a board, and how boards tile a larger torus.
//!
//! Each of the six edges of a board hexagon exposes `2 * layers` links. The
//! chips along an edge each expose two of them, except that on three of the
//! edges the corner chips at either end expose only one. The per-edge data
//! below is fixed by the physical wiring; it is a table, not a formula.
//!
//! Relative to the centre of a 4-layer board, the top edge is the row
//! y = 4, the bottom edge the row y = -3, the left and right edges the
//! columns x = -4 and x = 3, and the two remaining edges the diagonals
//! running from (-4, 0) to (0, 4) and from (0, -3) to (3, 0).

use crate::{hexagon_node_count, Direction, Position};

/// One of the six edges of a board hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Edge {
    Top = 0,
    TopLeft = 1,
    BottomLeft = 2,
    Bottom = 3,
    BottomRight = 4,
    TopRight = 5,
}

/// Wiring data for one edge of a hexagon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSpec {
    /// First chip along the edge
    pub start: Position,
    /// Offset between consecutive chips along the edge
    pub step: Position,
    /// The two link directions each chip exposes, alternating by index
    pub links: [Direction; 2],
    /// Whether the first and last chips expose only one link
    pub corner_single: bool,
}

impl Edge {
    /// All edges in id order.
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::TopLeft,
        Self::BottomLeft,
        Self::Bottom,
        Self::BottomRight,
        Self::TopRight,
    ];

    /// Edge id.
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Look an edge up by id.
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Top),
            1 => Some(Self::TopLeft),
            2 => Some(Self::BottomLeft),
            3 => Some(Self::Bottom),
            4 => Some(Self::BottomRight),
            5 => Some(Self::TopRight),
            _ => None,
        }
    }

    /// The edge on the far side of the hexagon.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::TopLeft => Self::BottomRight,
            Self::BottomLeft => Self::TopRight,
            Self::Bottom => Self::Top,
            Self::BottomRight => Self::TopLeft,
            Self::TopRight => Self::BottomLeft,
        }
    }

    /// Wiring data for this edge of a `layers`-layer hexagon.
    pub const fn spec(self, layers: u32) -> EdgeSpec {
        use Direction::*;

        let l = layers as i64;
        let (start, step, links, corner_single) = match self {
            Self::Top => ((0, l), (1, 0), [North, NorthEast], false),
            Self::TopLeft => ((-l, 0), (1, 1), [North, West], true),
            Self::BottomLeft => ((-l, -l + 1), (0, 1), [SouthWest, West], false),
            Self::Bottom => ((-l, -l + 1), (1, 0), [South, SouthWest], true),
            Self::BottomRight => ((0, -l + 1), (1, 1), [South, East], false),
            Self::TopRight => ((l - 1, 0), (0, 1), [NorthEast, East], true),
        };
        EdgeSpec {
            start: Position::new(start.0, start.1),
            step: Position::new(step.0, step.1),
            links,
            corner_single,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::TopLeft => "top-left",
            Self::BottomLeft => "bottom-left",
            Self::Bottom => "bottom",
            Self::BottomRight => "bottom-right",
            Self::TopRight => "top-right",
        };
        f.write_str(name)
    }
}

/// Number of links exposed along one edge of a `layers`-layer hexagon.
#[inline]
pub const fn links_per_edge(layers: u32) -> usize {
    2 * layers as usize
}

/// The `index`-th link along `edge`: the chip it leaves from (relative to the
/// hexagon centre) and the direction it leaves in.
///
/// Returns `None` if `index` is not below [`links_per_edge`].
pub fn hexagon_edge_link(edge: Edge, index: usize, layers: u32) -> Option<(Position, Direction)> {
    if index >= links_per_edge(layers) {
        return None;
    }

    let spec = edge.spec(layers);
    let offset = ((index + spec.corner_single as usize) / 2) as i64;
    let node = Position::new(
        spec.start.x + spec.step.x * offset,
        spec.start.y + spec.step.y * offset,
    );
    Some((node, spec.links[index % 2]))
}

/// A single link crossing the boundary of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryLink {
    pub edge: Edge,
    pub index: usize,
    pub node: Position,
    pub direction: Direction,
}

/// Every boundary link of a `layers`-layer hexagon, edge by edge.
pub fn hexagon_edge_links(layers: u32) -> impl Iterator<Item = BoundaryLink> {
    Edge::ALL.into_iter().flat_map(move |edge| {
        (0..links_per_edge(layers)).filter_map(move |index| {
            hexagon_edge_link(edge, index, layers).map(|(node, direction)| BoundaryLink {
                edge,
                index,
                node,
                direction,
            })
        })
    })
}

/// Offsets of every board in a torus of `width × height` tiles.
///
/// Each 12×12 tile holds three 4-layer boards. Offsets are ordered by tile
/// column, then tile row, then board within the tile.
pub fn board_tile_offsets(width: u32, height: u32) -> Vec<Position> {
    let mut offsets = Vec::with_capacity((width * height * 3) as usize);
    for x in 0..width as i64 {
        for y in 0..height as i64 {
            for z in 0..3i64 {
                offsets.push(Position::new(4 * (x * 3 + z), 4 * (y * 3 + (3 - z) % 3)));
            }
        }
    }
    offsets
}

/// Chips covered by a torus of `width × height` board tiles.
pub const fn tiled_chip_count(width: u32, height: u32) -> u64 {
    3 * width as u64 * height as u64 * hexagon_node_count(4)
}
