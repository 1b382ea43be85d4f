//! Error types for hexmesh-tables.

use hexmesh_topology::Position;
use thiserror::Error;

use crate::{SystemShape, TrafficPattern};

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating, encoding or validating tables.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested system cannot be built.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A value does not fit the bits the wire format gives it.
    #[error("field `{field}`{} = {value} does not fit (must be below {limit})", describe_node(.node))]
    FieldOverflow {
        field: &'static str,
        node: Option<Position>,
        value: u64,
        limit: u64,
    },

    /// A serialized table is malformed or inconsistent.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_node(node: &Option<Position>) -> String {
    match node {
        Some(p) => format!(" of chip {}", p),
        None => String::new(),
    }
}

/// Problems with the requested shape, pattern or settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board-shaped systems must be at least 8x8, got {width}x{height}")]
    BoardTooSmall { width: u32, height: u32 },

    #[error("system must contain at least one chip, got {width}x{height}")]
    EmptySystem { width: u32, height: u32 },

    #[error("unknown system shape `{0}` (expected `torus` or `board`)")]
    UnknownShape(String),

    #[error("unknown traffic pattern `{0}` (expected `cyclic`, `tornado`, `transpose` or `complement`)")]
    UnknownPattern(String),

    #[error("{pattern} traffic from chip {node} targets chip {destination}, which is not in the system")]
    InactiveDestination {
        pattern: TrafficPattern,
        node: Position,
        destination: Position,
    },

    #[error("invalid value `{value}` for {name}")]
    InvalidValue { name: &'static str, value: String },
}

/// Problems found while decoding or validating a serialized table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("table contains no chip blocks")]
    Empty,

    #[error("line {line}: `{token}` is not a 16-bit hex word")]
    InvalidToken { line: usize, token: String },

    #[error("table must end with terminator 0xBBBB, found {found:#06X}")]
    MissingTerminator { found: u16 },

    #[error("{words} words before the terminator is not a whole number of {chunk}-word chip blocks")]
    BadLength { words: usize, chunk: usize },

    #[error("{nodes} chip blocks is not a square system")]
    NotSquare { nodes: usize },

    #[error("routing tables hold {num_chips} entries but the table has {nodes} chips")]
    ChipCountMismatch { num_chips: usize, nodes: usize },

    #[error("{shape} does not match a table of {nodes} chips")]
    ShapeMismatch { shape: SystemShape, nodes: usize },

    #[error("chip {node}: reserved bits set in word {offset} ({word:#06X})")]
    ReservedBits { node: Position, offset: usize, word: u16 },

    #[error("chip {node}: given chip id {found:#04X}, expected {expected:#04X}")]
    WrongChipId { node: Position, expected: u8, found: u8 },

    #[error("chip {node}: first destination is {found:#04X}, expected {expected:#04X}")]
    WrongFirstDestination { node: Position, expected: u8, found: u8 },

    #[error("chip {node}: {found} destinations, expected {expected}")]
    WrongDestinationCount { node: Position, expected: u8, found: u8 },

    #[error("chip {node}: {field} is {found}, but the rest of the system uses {expected}")]
    NonUniform {
        field: &'static str,
        node: Position,
        expected: u16,
        found: u16,
    },

    #[error("chip {node} is outside the board but its {field} is {found}, not zero")]
    NonZeroInactive {
        field: &'static str,
        node: Position,
        found: u16,
    },
}
