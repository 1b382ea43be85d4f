//! Independent checking of serialized tables.
//!
//! The validator splits a word stream back into chip blocks and re-derives
//! what each block should say from the topology rules: the chip's own key,
//! its first destination and destination count under the traffic pattern,
//! and the system-wide settings. The first disagreement is reported as a
//! [`FormatError`] naming the chip and the invariant it broke.

use std::path::Path;

use hexmesh_topology::Position;
use tracing::{debug, info};

use crate::codec::{
    key_position, parse_table, position_key, HEADER_WORDS, NULL_KEY, RESERVED_ROUTE_BIT,
    TERMINATOR,
};
use crate::{FormatError, Result, SystemShape, TableConfig, TrafficPattern};

/// Read and parse a table file.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<u16>> {
    let text = std::fs::read_to_string(path)?;
    parse_table(&text)
}

/// How a word stream divides into chip blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Routing entries per block
    pub num_chips: usize,
    /// Number of chip blocks
    pub nodes: usize,
    /// Side of the square system
    pub size: usize,
}

impl TableLayout {
    /// Check the terminator and block structure of `words`.
    pub fn of(words: &[u16], num_chips: usize) -> Result<Self> {
        let (&last, body) = words.split_last().ok_or(FormatError::Empty)?;
        if last != TERMINATOR {
            return Err(FormatError::MissingTerminator { found: last }.into());
        }

        let chunk = num_chips
            .checked_add(HEADER_WORDS)
            .ok_or(FormatError::BadLength { words: body.len(), chunk: usize::MAX })?;
        if body.len() % chunk != 0 {
            return Err(FormatError::BadLength { words: body.len(), chunk }.into());
        }

        let nodes = body.len() / chunk;
        if nodes == 0 {
            return Err(FormatError::Empty.into());
        }
        let size = (nodes as f64).sqrt().round() as usize;
        if size * size != nodes {
            return Err(FormatError::NotSquare { nodes }.into());
        }
        if num_chips != nodes {
            return Err(FormatError::ChipCountMismatch { num_chips, nodes }.into());
        }

        Ok(Self { num_chips, nodes, size })
    }

    /// Words in each chip block.
    pub fn block_len(&self) -> usize {
        self.num_chips + HEADER_WORDS
    }

    /// Position of block `index`, filled row by row from the bottom.
    pub fn position_of(&self, index: usize) -> Position {
        Position::new((index % self.size) as i64, (index / self.size) as i64)
    }

    /// Chip blocks of `words`, which must have produced this layout.
    pub fn blocks<'a>(&self, words: &'a [u16]) -> impl Iterator<Item = NodeBlock<'a>> + 'a {
        let layout = *self;
        words[..words.len() - 1]
            .chunks_exact(self.block_len())
            .enumerate()
            .map(move |(index, words)| NodeBlock {
                index,
                position: layout.position_of(index),
                offset: index * layout.block_len(),
                num_chips: layout.num_chips,
                words,
            })
    }
}

/// A read-only view of one chip's block.
#[derive(Debug, Clone, Copy)]
pub struct NodeBlock<'a> {
    pub index: usize,
    pub position: Position,
    /// Word offset of the block in the table
    pub offset: usize,
    num_chips: usize,
    words: &'a [u16],
}

impl<'a> NodeBlock<'a> {
    /// Routing words.
    pub fn routes(&self) -> &'a [u16] {
        &self.words[..self.num_chips]
    }

    fn header(&self, i: usize) -> u16 {
        self.words[self.num_chips + i]
    }

    pub fn first_destination_key(&self) -> u8 {
        (self.header(0) >> 8) as u8
    }

    pub fn chip_key(&self) -> u8 {
        (self.header(0) & 0xFF) as u8
    }

    /// High byte of the destination-count word; must be zero.
    pub fn count_reserved(&self) -> u8 {
        (self.header(1) >> 8) as u8
    }

    pub fn destination_count(&self) -> u8 {
        (self.header(1) & 0xFF) as u8
    }

    pub fn consumption_delay(&self) -> u16 {
        self.header(2) >> 10
    }

    pub fn injection_rate(&self) -> u16 {
        self.header(2) & 0x03FF
    }

    pub fn router_timeout(&self) -> u16 {
        self.header(3)
    }

    pub fn sample_period(&self) -> u16 {
        self.header(4)
    }

    /// The four system-wide fields, by name.
    pub fn settings(&self) -> [(&'static str, u16); 4] {
        [
            ("consumption_delay", self.consumption_delay()),
            ("injection_rate", self.injection_rate()),
            ("router_timeout", self.router_timeout()),
            ("sample_period", self.sample_period()),
        ]
    }

    /// Routing words in router-table layout: `(y << 8 | x, route bits)`.
    ///
    /// Router tables index by (y, x), the reverse of the key order used
    /// here.
    pub fn spinnaker_entries(&self) -> Vec<(u32, u32)> {
        self.routes()
            .iter()
            .map(|&word| {
                let dest = key_position((word >> 8) as u8);
                (((dest.y << 8) | dest.x) as u32, (word & 0x7F) as u32)
            })
            .collect()
    }

    /// [`spinnaker_entries`](Self::spinnaker_entries) as text, one per line.
    pub fn format_spinnaker_table(&self) -> String {
        self.spinnaker_entries()
            .iter()
            .map(|(key, route)| format!("0x{:08X}, 0x{:08X}\n", key, route))
            .collect()
    }
}

/// What a valid table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSummary {
    pub shape: SystemShape,
    pub pattern: TrafficPattern,
    pub nodes: usize,
    pub active_nodes: usize,
    /// The uniform settings, or `None` if no chip exists
    pub settings: Option<TableConfig>,
}

/// Checks a serialized table for consistency.
#[derive(Debug, Clone)]
pub struct TableValidator {
    num_chips: usize,
    shape: Option<SystemShape>,
    pattern: TrafficPattern,
    expected: Option<TableConfig>,
}

impl TableValidator {
    /// A validator for tables whose routing tables hold `num_chips` entries.
    ///
    /// Unless overridden, an 8×8 system is taken to be a single board and
    /// anything else a torus, and traffic is assumed cyclic.
    pub fn new(num_chips: usize) -> Self {
        Self {
            num_chips,
            shape: None,
            pattern: TrafficPattern::Cyclic,
            expected: None,
        }
    }

    pub fn with_shape(mut self, shape: SystemShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_pattern(mut self, pattern: TrafficPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Require the system-wide fields to hold exactly these values.
    ///
    /// Without this the first chip that exists sets the values every other
    /// chip is compared against.
    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.expected = Some(config);
        self
    }

    fn resolve_shape(&self, layout: &TableLayout) -> Result<SystemShape> {
        let size = layout.size as u32;
        match self.shape {
            Some(shape) => {
                if shape.width() != size || shape.height() != size {
                    return Err(FormatError::ShapeMismatch { shape, nodes: layout.nodes }.into());
                }
                shape.validate()?;
                Ok(shape)
            }
            None if size == 8 => SystemShape::board(size, size),
            None => SystemShape::torus(size, size),
        }
    }

    /// Validate a parsed table.
    pub fn validate(&self, words: &[u16]) -> Result<TableSummary> {
        if let Some(config) = &self.expected {
            config.validate()?;
        }
        let layout = TableLayout::of(words, self.num_chips)?;
        let shape = self.resolve_shape(&layout)?;
        info!(%shape, pattern = %self.pattern, nodes = layout.nodes, "validating table");

        let mut reference = self.expected.map(|c| settings_of(&c));
        let mut active_nodes = 0;

        for block in layout.blocks(words) {
            let node = block.position;
            let active = shape.is_active(node);
            debug!(chip = %node, active, "checking chip block");

            for (i, &word) in block.routes().iter().enumerate() {
                if word & RESERVED_ROUTE_BIT != 0 {
                    return Err(FormatError::ReservedBits { node, offset: block.offset + i, word }.into());
                }
            }

            let expected_id = position_key(node, "chip", node)?;
            if block.chip_key() != expected_id {
                return Err(FormatError::WrongChipId {
                    node,
                    expected: expected_id,
                    found: block.chip_key(),
                }
                .into());
            }

            let destinations = self.pattern.destinations(&shape, node)?;
            let expected_first = match destinations.first {
                Some(first) => position_key(first, "first_destination", node)?,
                None => NULL_KEY,
            };
            if block.first_destination_key() != expected_first {
                return Err(FormatError::WrongFirstDestination {
                    node,
                    expected: expected_first,
                    found: block.first_destination_key(),
                }
                .into());
            }

            if block.count_reserved() != 0 {
                return Err(FormatError::ReservedBits {
                    node,
                    offset: block.offset + layout.num_chips + 1,
                    word: block.header(1),
                }
                .into());
            }

            let found_count = block.destination_count();
            if found_count as usize != destinations.count {
                return Err(FormatError::WrongDestinationCount {
                    node,
                    expected: destinations.count as u8,
                    found: found_count,
                }
                .into());
            }

            if !active {
                for (field, found) in block.settings() {
                    if found != 0 {
                        return Err(FormatError::NonZeroInactive { field, node, found }.into());
                    }
                }
                continue;
            }

            active_nodes += 1;
            let settings = block.settings();
            let expected = *reference.get_or_insert(settings);
            for ((field, found), (_, want)) in settings.into_iter().zip(expected) {
                if found != want {
                    return Err(FormatError::NonUniform { field, node, expected: want, found }.into());
                }
            }
        }

        let settings = reference.map(|s| TableConfig {
            consumption_delay: s[0].1.into(),
            injection_rate: s[1].1.into(),
            router_timeout: s[2].1.into(),
            sample_period: s[3].1.into(),
        });
        if let Some(s) = &settings {
            info!(
                size = layout.size,
                sample_period = s.sample_period,
                router_timeout = s.router_timeout,
                injection_rate = s.injection_rate,
                consumption_delay = s.consumption_delay,
                "table is consistent"
            );
        }

        Ok(TableSummary {
            shape,
            pattern: self.pattern,
            nodes: layout.nodes,
            active_nodes,
            settings,
        })
    }

    /// Parse and validate table text.
    pub fn validate_text(&self, text: &str) -> Result<TableSummary> {
        self.validate(&parse_table(text)?)
    }
}

fn settings_of(config: &TableConfig) -> [(&'static str, u16); 4] {
    [
        ("consumption_delay", config.consumption_delay as u16),
        ("injection_rate", config.injection_rate as u16),
        ("router_timeout", config.router_timeout as u16),
        ("sample_period", config.sample_period as u16),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_table, SENTINEL};
    use crate::{Error, FormatError};

    fn board_table() -> Vec<u16> {
        let shape = SystemShape::board(8, 8).unwrap();
        encode_table(shape, TrafficPattern::Cyclic, TableConfig::default()).unwrap()
    }

    /// Offset of header word `i` of the chip at (x, y) in an 8×8 table.
    fn header_offset(x: usize, y: usize, i: usize) -> usize {
        (y * 8 + x) * (64 + HEADER_WORDS) + 64 + i
    }

    fn check(words: &[u16]) -> Result<TableSummary> {
        TableValidator::new(64).validate(words)
    }

    #[test]
    fn generated_board_table_is_valid() {
        let summary = check(&board_table()).unwrap();
        assert_eq!(summary.shape, SystemShape::board(8, 8).unwrap());
        assert_eq!(summary.nodes, 64);
        assert_eq!(summary.active_nodes, 48);
        assert_eq!(summary.settings, Some(TableConfig::default()));
    }

    #[test]
    fn missing_terminator() {
        let mut words = board_table();
        words.pop();
        assert!(matches!(check(&words), Err(Error::Format(FormatError::MissingTerminator { .. }))));
        assert!(matches!(check(&[]), Err(Error::Format(FormatError::Empty))));
        assert!(matches!(check(&[TERMINATOR]), Err(Error::Format(FormatError::Empty))));
    }

    #[test]
    fn truncated_block() {
        let mut words = board_table();
        words.remove(0);
        assert!(matches!(
            check(&words),
            Err(Error::Format(FormatError::BadLength { chunk: 69, .. }))
        ));
    }

    #[test]
    fn non_square_system() {
        let words = encode_table(
            SystemShape::torus(3, 2).unwrap(),
            TrafficPattern::Cyclic,
            TableConfig::default(),
        )
        .unwrap();
        assert!(matches!(
            TableValidator::new(6).validate(&words),
            Err(Error::Format(FormatError::NotSquare { nodes: 6 }))
        ));
    }

    #[test]
    fn wrong_chip_count() {
        let words = encode_table(
            SystemShape::torus(2, 2).unwrap(),
            TrafficPattern::Cyclic,
            TableConfig::default(),
        )
        .unwrap();
        // 4 blocks of 9 words also read as a single block of 36
        assert!(matches!(
            TableValidator::new(31).validate(&words),
            Err(Error::Format(FormatError::ChipCountMismatch { num_chips: 31, nodes: 1 }))
        ));
        assert!(matches!(
            TableValidator::new(5).validate(&words),
            Err(Error::Format(FormatError::BadLength { chunk: 10, .. }))
        ));
        assert!(TableValidator::new(4).validate(&words).is_ok());
    }

    #[test]
    fn reserved_route_bit() {
        let mut words = board_table();
        words[70] |= 0x80;
        match check(&words) {
            Err(Error::Format(FormatError::ReservedBits { node, offset, .. })) => {
                assert_eq!(node, Position::new(1, 0));
                assert_eq!(offset, 70);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn wrong_chip_id() {
        let mut words = board_table();
        words[header_offset(2, 0, 0)] ^= 0x0001;
        assert!(matches!(
            check(&words),
            Err(Error::Format(FormatError::WrongChipId { expected: 0x20, found: 0x21, .. }))
        ));
    }

    #[test]
    fn wrong_first_destination() {
        let mut words = board_table();
        let at = header_offset(4, 3, 0);
        words[at] = (0x55 << 8) | (words[at] & 0xFF);
        assert!(matches!(
            check(&words),
            Err(Error::Format(FormatError::WrongFirstDestination { expected: 0x53, found: 0x55, .. }))
        ));
    }

    #[test]
    fn wrong_destination_count() {
        let mut words = board_table();
        words[header_offset(0, 0, 1)] = 63;
        assert!(matches!(
            check(&words),
            Err(Error::Format(FormatError::WrongDestinationCount { expected: 47, found: 63, .. }))
        ));
    }

    #[test]
    fn reserved_count_byte() {
        let mut words = board_table();
        words[header_offset(0, 0, 1)] |= 0x0100;
        assert!(matches!(check(&words), Err(Error::Format(FormatError::ReservedBits { .. }))));
    }

    #[test]
    fn non_uniform_timeout() {
        let mut words = board_table();
        words[header_offset(3, 2, 3)] = 51;
        match check(&words) {
            Err(Error::Format(FormatError::NonUniform { field, node, expected, found })) => {
                assert_eq!(field, "router_timeout");
                assert_eq!(node, Position::new(3, 2));
                assert_eq!(expected, 50);
                assert_eq!(found, 51);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn settings_outside_board_must_be_zero() {
        let mut words = board_table();
        words[header_offset(7, 0, 2)] = 16;
        assert!(matches!(
            check(&words),
            Err(Error::Format(FormatError::NonZeroInactive { field: "injection_rate", .. }))
        ));
    }

    #[test]
    fn expected_config_is_enforced() {
        let config = TableConfig { sample_period: 1000, ..Default::default() };
        let result = TableValidator::new(64).with_config(config).validate(&board_table());
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::NonUniform { field: "sample_period", expected: 1000, .. }))
        ));
    }

    #[test]
    fn oversized_expected_config_is_rejected() {
        let config = TableConfig { sample_period: 125536, ..Default::default() };
        let result = TableValidator::new(64).with_config(config).validate(&board_table());
        assert!(matches!(
            result,
            Err(Error::FieldOverflow { field: "sample_period", node: None, value: 125536, .. })
        ));
    }

    #[test]
    fn huge_chip_count_is_a_length_error() {
        assert!(matches!(
            TableLayout::of(&board_table(), usize::MAX),
            Err(Error::Format(FormatError::BadLength { .. }))
        ));
    }

    #[test]
    fn eight_by_eight_torus_needs_explicit_shape() {
        let shape = SystemShape::torus(8, 8).unwrap();
        let words = encode_table(shape, TrafficPattern::Cyclic, TableConfig::default()).unwrap();
        assert!(check(&words).is_err());
        let summary = TableValidator::new(64).with_shape(shape).validate(&words).unwrap();
        assert_eq!(summary.active_nodes, 64);
    }

    #[test]
    fn shape_must_match_size() {
        let result = TableValidator::new(64)
            .with_shape(SystemShape::torus(4, 4).unwrap())
            .validate(&board_table());
        assert!(matches!(result, Err(Error::Format(FormatError::ShapeMismatch { nodes: 64, .. }))));
    }

    #[test]
    fn spinnaker_layout_swaps_axes() {
        let words = board_table();
        let layout = TableLayout::of(&words, 64).unwrap();
        let last = layout.blocks(&words).nth(layout.nodes - 1).unwrap();
        assert_eq!(last.position, Position::new(7, 7));

        // (7, 0) is outside the board: every slot is a sentinel
        let absent = layout.blocks(&words).nth(7).unwrap();
        assert_eq!(absent.position, Position::new(7, 0));
        assert!(absent.routes().iter().all(|&w| w == SENTINEL));
        assert!(absent.spinnaker_entries().iter().all(|&(key, route)| key == 0x0F0F && route == 0));

        let centre = layout.blocks(&words).nth(3 * 8 + 4).unwrap();
        let entries = centre.spinnaker_entries();
        assert_eq!(entries.len(), 64);
        // First route is to (0, 0), reached by heading west
        assert_eq!(entries[0], (0x0000, 1 << 3));
        let text = centre.format_spinnaker_table();
        assert!(text.starts_with("0x00000000, 0x00000008\n"));
    }

    #[test]
    fn text_round_trip() {
        let text = crate::codec::format_table(&board_table());
        assert!(TableValidator::new(64).validate_text(&text).is_ok());
    }
}
