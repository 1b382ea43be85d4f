//! Hexmesh Tables - per-chip routing and configuration tables
//!
//! Every chip in a hexmesh system is loaded with a block of 16-bit words
//! describing where to forward each packet, where its own traffic goes, and
//! the system-wide timing settings. This crate builds those blocks, writes
//! them as a flat word table, and checks a table read back from disk.
//!
//! # Overview
//!
//! - [`SystemShape`]: a full torus, or a single 48-chip board in an 8×8 box
//! - [`TrafficPattern`]: where each chip sends its packets
//! - [`generate_routing_table`]: one next-hop direction per destination
//! - [`TableEncoder`]: whole-system encoding in the [`codec`] word format
//! - [`TableValidator`]: independent consistency checks on a word table
//!
//! # Example
//!
//! ```rust
//! use hexmesh_tables::{SystemShape, TableConfig, TableEncoder, TableValidator, TrafficPattern};
//!
//! let shape = SystemShape::board(8, 8)?;
//! let encoder = TableEncoder::new(shape, TrafficPattern::Cyclic, TableConfig::default())?;
//! let words = encoder.encode()?;
//!
//! let summary = TableValidator::new(shape.num_chips()).validate(&words)?;
//! assert_eq!(summary.active_nodes, 48);
//! # Ok::<(), hexmesh_tables::Error>(())
//! ```

pub mod codec;
mod config;
mod error;
mod routing;
mod shape;
mod traffic;
pub mod validate;

pub use codec::{
    encode_table, format_table, generate_table, parse_table, NodeConfig, TableEncoder,
};
pub use config::{
    TableConfig, CONSUMPTION_DELAY_LIMIT, INJECTION_RATE_LIMIT, ROUTER_TIMEOUT_LIMIT,
    SAMPLE_PERIOD_LIMIT,
};
pub use error::{ConfigError, Error, FormatError, Result};
pub use routing::{generate_routing_table, RouteEntry};
pub use shape::{ShapeKind, SystemShape, MIN_BOARD_SIZE};
pub use traffic::{traffic_destinations, Destinations, TrafficPattern};
pub use validate::{read_table, NodeBlock, TableLayout, TableSummary, TableValidator};
