//! End-to-end table tests: generate, serialize, read back, validate.

use hexmesh_tables::codec::{key_position, HEADER_WORDS, RESERVED_ROUTE_BIT, TERMINATOR};
use hexmesh_tables::{
    encode_table, format_table, generate_table, read_table, ConfigError, Error, FormatError,
    SystemShape, TableConfig, TableLayout, TableValidator, TrafficPattern,
};
use hexmesh_topology::{shortest_path, Direction, Position};
use proptest::prelude::*;

fn decode_direction(word: u16) -> Direction {
    let mask = (word & 0x7F) as u8;
    assert_eq!(mask.count_ones(), 1, "route word {:#06X} names one port", word);
    Direction::from_index(mask.trailing_zeros() as u8).unwrap()
}

#[test]
fn test_board_table_validates() {
    let shape = SystemShape::board(8, 8).unwrap();
    let config = TableConfig {
        injection_rate: 16,
        consumption_delay: 10,
        router_timeout: 50,
        sample_period: 60000,
    };
    let words = encode_table(shape, TrafficPattern::Cyclic, config).unwrap();
    assert_eq!(words.len(), 64 * (64 + HEADER_WORDS) + 1);
    assert_eq!(*words.last().unwrap(), TERMINATOR);

    // Chip (0, 0) sends first to (1, 0) and cycles through the other 47
    assert_eq!(words[64], 0x1000);
    assert_eq!(words[65], 47);

    let summary = TableValidator::new(64).validate(&words).unwrap();
    assert_eq!(summary.active_nodes, 48);
    assert_eq!(summary.settings, Some(config));
}

#[test]
fn test_torus_tables_validate_for_every_pattern() {
    let shape = SystemShape::torus(4, 4).unwrap();
    for pattern in TrafficPattern::ALL {
        let words = encode_table(shape, pattern, TableConfig::default()).unwrap();
        let summary = TableValidator::new(16)
            .with_shape(shape)
            .with_pattern(pattern)
            .with_config(TableConfig::default())
            .validate(&words)
            .unwrap();
        assert_eq!(summary.nodes, 16);
        assert_eq!(summary.active_nodes, 16);
        assert_eq!(summary.pattern, pattern);
    }
}

#[test]
fn test_wrong_pattern_is_detected() {
    let shape = SystemShape::torus(4, 4).unwrap();
    let words = encode_table(shape, TrafficPattern::Complement, TableConfig::default()).unwrap();
    let result = TableValidator::new(16).with_shape(shape).validate(&words);
    assert!(matches!(
        result,
        Err(Error::Format(FormatError::WrongFirstDestination { .. }))
    ));
}

#[test]
fn test_torus_cyclic_wraps_to_origin() {
    let shape = SystemShape::torus(8, 8).unwrap();
    let words = encode_table(shape, TrafficPattern::Cyclic, TableConfig::default()).unwrap();
    let layout = TableLayout::of(&words, 64).unwrap();
    let last = layout.blocks(&words).last().unwrap();
    assert_eq!(last.position, Position::new(7, 7));
    assert_eq!(last.chip_key(), 0x77);
    assert_eq!(last.first_destination_key(), 0x00);
    assert_eq!(last.destination_count(), 63);
}

#[test]
fn test_board_rejects_patterns_leaving_the_board() {
    let shape = SystemShape::board(8, 8).unwrap();
    for pattern in [TrafficPattern::Tornado, TrafficPattern::Transpose, TrafficPattern::Complement] {
        assert!(matches!(
            encode_table(shape, pattern, TableConfig::default()),
            Err(Error::Configuration(ConfigError::InactiveDestination { .. }))
        ));
    }
}

#[test]
fn test_table_file_round_trip() {
    let shape = SystemShape::torus(3, 3).unwrap();
    let text = generate_table(shape, TrafficPattern::Tornado, TableConfig::default()).unwrap();

    let path = std::env::temp_dir().join(format!("hexmesh-table-{}.txt", std::process::id()));
    std::fs::write(&path, format!("{}\n", text)).unwrap();
    let words = read_table(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(format_table(&words), text);
    let summary = TableValidator::new(9)
        .with_pattern(TrafficPattern::Tornado)
        .validate(&words)
        .unwrap();
    assert_eq!(summary.shape, shape);
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("hexmesh-no-such-table.txt");
    assert!(matches!(read_table(&path), Err(Error::Io(_))));
}

#[test]
fn test_routes_lead_to_destination() {
    let shape = SystemShape::torus(6, 6).unwrap();
    let words = encode_table(shape, TrafficPattern::Cyclic, TableConfig::default()).unwrap();
    let layout = TableLayout::of(&words, 36).unwrap();
    let blocks: Vec<_> = layout.blocks(&words).collect();

    for src in shape.positions() {
        for (slot, _) in blocks[0].routes().iter().enumerate() {
            let dst = key_position((blocks[0].routes()[slot] >> 8) as u8);
            let expected_hops = shortest_path(src, dst, Some(shape.bounds())).manhattan();

            let mut at = src;
            let mut hops = 0;
            loop {
                let word = blocks[shape.index_of(at)].routes()[slot];
                let dir = decode_direction(word);
                if dir == Direction::Local {
                    break;
                }
                let next = at.step(dir);
                at = Position::new(next.x.rem_euclid(6), next.y.rem_euclid(6));
                hops += 1;
                assert!(hops <= expected_hops, "{} -> {} overshoots", src, dst);
            }
            assert_eq!(at, dst);
            assert_eq!(hops, expected_hops);
        }
    }
}

#[test]
fn test_corrupted_settings_are_reported() {
    let shape = SystemShape::torus(4, 4).unwrap();
    let mut words = encode_table(shape, TrafficPattern::Cyclic, TableConfig::default()).unwrap();
    // Sample period of chip (2, 1)
    let at = (4 + 2) * (16 + HEADER_WORDS) + 16 + 4;
    words[at] = 1;
    let err = TableValidator::new(16).validate(&words).unwrap_err();
    assert!(err.to_string().contains("sample_period"), "{}", err);
}

proptest! {
    #[test]
    fn prop_route_words_keep_bit_seven_clear(
        width in 1u32..=10,
        height in 1u32..=10,
        pattern_index in 0usize..4,
    ) {
        let pattern = TrafficPattern::ALL[pattern_index];
        prop_assume!(pattern != TrafficPattern::Transpose || width == height);

        let shape = SystemShape::torus(width, height).unwrap();
        let words = encode_table(shape, pattern, TableConfig::default()).unwrap();
        let block = shape.num_chips() + HEADER_WORDS;
        prop_assert_eq!(words.len(), shape.num_chips() * block + 1);
        for chunk in words[..words.len() - 1].chunks(block) {
            for &word in &chunk[..shape.num_chips()] {
                prop_assert_eq!(word & RESERVED_ROUTE_BIT, 0);
            }
        }

        if width == height {
            let summary = TableValidator::new(shape.num_chips())
                .with_shape(shape)
                .with_pattern(pattern)
                .validate(&words)
                .unwrap();
            prop_assert_eq!(summary.active_nodes, shape.num_chips());
        }
    }

    #[test]
    fn prop_board_in_larger_box_validates(extra_w in 0u32..=4, extra_h in 0u32..=4) {
        let shape = SystemShape::board(8 + extra_w, 8 + extra_h).unwrap();
        let words = encode_table(shape, TrafficPattern::Cyclic, TableConfig::default()).unwrap();
        prop_assert_eq!(*words.last().unwrap(), TERMINATOR);
        if extra_w == extra_h {
            let summary = TableValidator::new(shape.num_chips())
                .with_shape(shape)
                .validate(&words)
                .unwrap();
            prop_assert_eq!(summary.active_nodes, 48);
        }
    }
}
