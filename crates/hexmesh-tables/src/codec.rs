//! The 16-bit word table format.
//!
//! A table is a flat list of 16-bit words, written as 4-digit uppercase hex
//! one per line. Every position of the bounding box gets a block of
//! `num_chips + 5` words, bottom row first:
//!
//! | words       | content                                        |
//! |-------------|------------------------------------------------|
//! | `num_chips` | `key << 8 \| 1 << direction` routes, `0xFF00` unused |
//! | 1           | `first_destination_key << 8 \| chip_key`       |
//! | 1           | `0x00 << 8 \| destination_count`               |
//! | 1           | `consumption_delay << 10 \| injection_rate`    |
//! | 1           | `router_timeout`                               |
//! | 1           | `sample_period`                                |
//!
//! and the table ends with the single word `0xBBBB`. A key packs a position
//! as `x << 4 | y`, so neither coordinate may exceed 15.

use hexmesh_topology::Position;
use tracing::{debug, info};

use crate::{
    generate_routing_table, Destinations, Error, FormatError, Result, RouteEntry, SystemShape,
    TableConfig, TrafficPattern,
};

/// Final word of every table.
pub const TERMINATOR: u16 = 0xBBBB;

/// Routing slot with no destination.
pub const SENTINEL: u16 = 0xFF00;

/// Key used as the first destination of absent chips.
pub const NULL_KEY: u8 = 0xFF;

/// Words following the routing table in each chip block.
pub const HEADER_WORDS: usize = 5;

/// Bit 7 of a routing word is reserved and must stay clear.
pub const RESERVED_ROUTE_BIT: u16 = 0x80;

/// Coordinates occupy 4 bits of a key.
pub const COORDINATE_LIMIT: i64 = 1 << 4;

/// Destination counts occupy the low byte of their word.
pub const DESTINATION_COUNT_LIMIT: usize = 1 << 8;

/// Pack a position into a key, reporting `field` on overflow.
pub fn position_key(pos: Position, field: &'static str, node: Position) -> Result<u8> {
    for (axis, value) in [("x", pos.x), ("y", pos.y)] {
        if !(0..COORDINATE_LIMIT).contains(&value) {
            return Err(Error::FieldOverflow {
                field: axis_field(field, axis),
                node: Some(node),
                value: value.unsigned_abs(),
                limit: COORDINATE_LIMIT as u64,
            });
        }
    }
    Ok(((pos.x << 4) | pos.y) as u8)
}

fn axis_field(field: &'static str, axis: &str) -> &'static str {
    match (field, axis) {
        ("chip", "x") => "chip_x",
        ("chip", _) => "chip_y",
        ("first_destination", "x") => "first_destination_x",
        ("first_destination", _) => "first_destination_y",
        (_, "x") => "destination_x",
        _ => "destination_y",
    }
}

/// Unpack a key into a position.
pub fn key_position(key: u8) -> Position {
    Position::new((key >> 4) as i64, (key & 0xF) as i64)
}

/// Encode one routing slot of the chip at `node`.
pub fn route_word(entry: &RouteEntry, node: Position) -> Result<u16> {
    match entry {
        RouteEntry::Sentinel => Ok(SENTINEL),
        RouteEntry::Route { destination, direction } => {
            let key = position_key(*destination, "destination", node)?;
            Ok(((key as u16) << 8) | direction.mask() as u16)
        }
    }
}

/// Everything one chip's block carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub position: Position,
    pub active: bool,
    pub routes: Vec<RouteEntry>,
    pub destinations: Destinations,
    /// System settings; all zero on absent chips
    pub settings: TableConfig,
}

impl NodeConfig {
    /// Build the block for the chip at `position`.
    pub fn build(
        shape: &SystemShape,
        pattern: TrafficPattern,
        config: &TableConfig,
        position: Position,
    ) -> Result<Self> {
        let active = shape.is_active(position);
        Ok(Self {
            position,
            active,
            routes: generate_routing_table(shape, position),
            destinations: pattern.destinations(shape, position)?,
            settings: if active { *config } else { TableConfig::ZERO },
        })
    }

    /// Append this block's words to `out`.
    pub fn encode_into(&self, out: &mut Vec<u16>) -> Result<()> {
        let node = self.position;
        for entry in &self.routes {
            out.push(route_word(entry, node)?);
        }

        let chip_key = position_key(node, "chip", node)?;
        let first_key = match self.destinations.first {
            Some(first) => position_key(first, "first_destination", node)?,
            None => NULL_KEY,
        };
        if self.destinations.count >= DESTINATION_COUNT_LIMIT {
            return Err(Error::FieldOverflow {
                field: "destination_count",
                node: Some(node),
                value: self.destinations.count as u64,
                limit: DESTINATION_COUNT_LIMIT as u64,
            });
        }

        out.push(((first_key as u16) << 8) | chip_key as u16);
        out.push(self.destinations.count as u16);
        out.push(self.settings.rate_word());
        out.push(self.settings.router_timeout as u16);
        out.push(self.settings.sample_period as u16);
        Ok(())
    }

    /// This block's words.
    pub fn encode(&self) -> Result<Vec<u16>> {
        let mut out = Vec::with_capacity(self.routes.len() + HEADER_WORDS);
        self.encode_into(&mut out)?;
        Ok(out)
    }
}

/// Builds complete tables for one system, pattern and set of settings.
#[derive(Debug, Clone)]
pub struct TableEncoder {
    shape: SystemShape,
    pattern: TrafficPattern,
    config: TableConfig,
}

impl TableEncoder {
    /// Check the inputs up front so encoding never emits a partial table.
    pub fn new(shape: SystemShape, pattern: TrafficPattern, config: TableConfig) -> Result<Self> {
        shape.validate()?;
        config.validate()?;
        Ok(Self { shape, pattern, config })
    }

    pub fn shape(&self) -> &SystemShape {
        &self.shape
    }

    pub fn pattern(&self) -> TrafficPattern {
        self.pattern
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Chip blocks in table order.
    pub fn nodes(&self) -> impl Iterator<Item = Result<NodeConfig>> + '_ {
        self.shape
            .positions()
            .map(move |p| NodeConfig::build(&self.shape, self.pattern, &self.config, p))
    }

    /// The whole table as words, terminator included.
    pub fn encode(&self) -> Result<Vec<u16>> {
        info!(
            shape = %self.shape,
            pattern = %self.pattern,
            chips = self.shape.active_count(),
            "generating table"
        );

        let block = self.shape.num_chips() + HEADER_WORDS;
        let mut out = Vec::with_capacity(self.shape.num_chips() * block + 1);
        for node in self.nodes() {
            let node = node?;
            debug!(chip = %node.position, active = node.active, "encoding chip block");
            node.encode_into(&mut out)?;
        }
        out.push(TERMINATOR);
        Ok(out)
    }

    /// The whole table as text.
    pub fn render(&self) -> Result<String> {
        Ok(format_table(&self.encode()?))
    }
}

/// Encode the table for a system.
pub fn encode_table(
    shape: SystemShape,
    pattern: TrafficPattern,
    config: TableConfig,
) -> Result<Vec<u16>> {
    TableEncoder::new(shape, pattern, config)?.encode()
}

/// Encode the table for a system as text.
pub fn generate_table(
    shape: SystemShape,
    pattern: TrafficPattern,
    config: TableConfig,
) -> Result<String> {
    TableEncoder::new(shape, pattern, config)?.render()
}

/// Render words as 4-digit uppercase hex, one per line.
pub fn format_table(words: &[u16]) -> String {
    words
        .iter()
        .map(|w| format!("{:04X}", w))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse whitespace-separated hex words.
pub fn parse_table(text: &str) -> Result<Vec<u16>> {
    let mut words = Vec::new();
    for (line, content) in text.lines().enumerate() {
        for token in content.split_whitespace() {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            let invalid = || FormatError::InvalidToken {
                line: line + 1,
                token: token.to_string(),
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid().into());
            }
            let word = u16::from_str_radix(digits, 16).map_err(|_| invalid())?;
            words.push(word);
        }
    }
    Ok(words)
}
