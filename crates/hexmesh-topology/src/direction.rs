//! Link directions of a chip.
//!
//! Every chip has six links to its neighbours plus the local port. The
//! numbering is fixed by the router hardware: it is the bit index used in
//! routing-table direction masks, so the discriminants must not change.

use crate::RoutingVector;

/// An outgoing port of a chip router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    North = 2,
    West = 3,
    SouthWest = 4,
    South = 5,
    /// The destination is this chip.
    Local = 6,
}

impl Direction {
    /// The six inter-chip links, counter-clockwise from east.
    pub const LINKS: [Self; 6] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::West,
        Self::SouthWest,
        Self::South,
    ];

    /// All seven router ports.
    pub const ALL: [Self; 7] = [
        Self::East,
        Self::NorthEast,
        Self::North,
        Self::West,
        Self::SouthWest,
        Self::South,
        Self::Local,
    ];

    /// Hardware port number (0..=6).
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Look a direction up by its port number.
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::East),
            1 => Some(Self::NorthEast),
            2 => Some(Self::North),
            3 => Some(Self::West),
            4 => Some(Self::SouthWest),
            5 => Some(Self::South),
            6 => Some(Self::Local),
            _ => None,
        }
    }

    /// One-hot port mask as used in routing-table entries.
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self.index()
    }

    /// Whether this is one of the six inter-chip links.
    pub const fn is_link(self) -> bool {
        !matches!(self, Self::Local)
    }

    /// The next link counter-clockwise. `Local` has no neighbours.
    pub const fn next_ccw(self) -> Option<Self> {
        self.rotate(1)
    }

    /// The next link clockwise. `Local` has no neighbours.
    pub const fn next_cw(self) -> Option<Self> {
        self.rotate(5)
    }

    /// The link pointing the other way. `Local` has no opposite.
    pub const fn opposite(self) -> Option<Self> {
        self.rotate(3)
    }

    const fn rotate(self, steps: u8) -> Option<Self> {
        if self.is_link() {
            Self::from_index((self.index() + steps) % 6)
        } else {
            None
        }
    }

    /// The single-hop vector for this direction in redundant form.
    pub const fn unit(self) -> RoutingVector {
        match self {
            Self::East => RoutingVector::new(1, 0, 0),
            Self::West => RoutingVector::new(-1, 0, 0),
            Self::North => RoutingVector::new(0, 1, 0),
            Self::South => RoutingVector::new(0, -1, 0),
            Self::NorthEast => RoutingVector::new(0, 0, -1),
            Self::SouthWest => RoutingVector::new(0, 0, 1),
            Self::Local => RoutingVector::ZERO,
        }
    }

    /// The direction a packet leaves in to follow `vector`.
    ///
    /// Axes are consulted in the order X, Y, Z and the first nonzero one
    /// decides. Router tables in the field were built with this order, so a
    /// two-axis vector always resolves to its X or Y hop first.
    pub const fn of_vector(vector: RoutingVector) -> Self {
        if vector.x < 0 {
            Self::West
        } else if vector.x > 0 {
            Self::East
        } else if vector.y < 0 {
            Self::South
        } else if vector.y > 0 {
            Self::North
        } else if vector.z < 0 {
            Self::NorthEast
        } else if vector.z > 0 {
            Self::SouthWest
        } else {
            Self::Local
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::East => "east",
            Self::NorthEast => "north-east",
            Self::North => "north",
            Self::West => "west",
            Self::SouthWest => "south-west",
            Self::South => "south",
            Self::Local => "local",
        };
        f.write_str(name)
    }
}

/// Convert a routing vector into the outgoing direction at its source.
pub fn vector_to_direction(vector: RoutingVector) -> Direction {
    Direction::of_vector(vector)
}
