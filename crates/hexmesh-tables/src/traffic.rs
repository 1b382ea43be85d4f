//! Synthetic traffic patterns.
//!
//! Each pattern tells a chip where to send its first packet and how many
//! destinations it cycles through in total.

use std::str::FromStr;

use hexmesh_topology::Position;
use tracing::trace;

use crate::{ConfigError, Error, Result, SystemShape};

/// A rule assigning destinations to every chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrafficPattern {
    /// Every chip sends to every other chip, starting with the next one
    /// along in row-major order.
    Cyclic,
    /// Every chip sends half-way across the system along its row.
    Tornado,
    /// (x, y) sends to (y, x).
    Transpose,
    /// (x, y) sends to (width-1-x, height-1-y).
    Complement,
}

impl TrafficPattern {
    pub const ALL: [Self; 4] = [Self::Cyclic, Self::Tornado, Self::Transpose, Self::Complement];

    /// Destinations of the chip at `node`.
    ///
    /// Absent chips get [`Destinations::NONE`]. A pattern that sends an
    /// existing chip to an absent one is a configuration error.
    pub fn destinations(self, shape: &SystemShape, node: Position) -> Result<Destinations> {
        if !shape.is_active(node) {
            return Ok(Destinations::NONE);
        }

        let (w, h) = (shape.width() as i64, shape.height() as i64);
        let (first, count) = match self {
            Self::Cyclic => (shape.next_active(node), shape.active_count() - 1),
            Self::Tornado => (Position::new((w / 2 + node.x) % w, node.y), 1),
            Self::Transpose => (Position::new(node.y, node.x), 1),
            Self::Complement => (Position::new(w - 1 - node.x, h - 1 - node.y), 1),
        };

        if !shape.is_active(first) {
            return Err(ConfigError::InactiveDestination {
                pattern: self,
                node,
                destination: first,
            }
            .into());
        }

        trace!(pattern = %self, %node, %first, count, "traffic destinations");
        Ok(Destinations {
            first: Some(first),
            count,
        })
    }
}

impl FromStr for TrafficPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cyclic" => Ok(Self::Cyclic),
            "tornado" => Ok(Self::Tornado),
            "transpose" => Ok(Self::Transpose),
            "complement" => Ok(Self::Complement),
            _ => Err(ConfigError::UnknownPattern(s.to_string()).into()),
        }
    }
}

impl std::fmt::Display for TrafficPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cyclic => "cyclic",
            Self::Tornado => "tornado",
            Self::Transpose => "transpose",
            Self::Complement => "complement",
        })
    }
}

/// Where a chip's traffic goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destinations {
    /// First destination, or `None` for a chip that does not exist
    pub first: Option<Position>,
    /// Number of distinct destinations
    pub count: usize,
}

impl Destinations {
    /// Marker for chips outside the system.
    pub const NONE: Self = Self { first: None, count: 0 };
}

/// Destinations of the chip at `node` under `pattern`.
pub fn traffic_destinations(
    pattern: TrafficPattern,
    shape: &SystemShape,
    node: Position,
) -> Result<Destinations> {
    pattern.destinations(shape, node)
}
