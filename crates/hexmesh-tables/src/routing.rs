//! Per-chip routing tables.
//!
//! Every chip gets a table with one slot per position of the bounding box,
//! so all tables have the same length. Routes to existing chips come first
//! in row-major order, including the chip's own `Local` entry, and the slots
//! left over by absent chips are filled with sentinels at the end.

use hexmesh_topology::{Direction, Position};

use crate::SystemShape;

/// One slot of a routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteEntry {
    /// Packets for `destination` leave through `direction`.
    Route {
        destination: Position,
        direction: Direction,
    },
    /// Unused slot.
    Sentinel,
}

impl RouteEntry {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            Self::Route { direction, .. } => Some(*direction),
            Self::Sentinel => None,
        }
    }
}

/// The routing table for the chip at `source`.
///
/// An absent chip gets a table made entirely of sentinels.
pub fn generate_routing_table(shape: &SystemShape, source: Position) -> Vec<RouteEntry> {
    let mut table = Vec::with_capacity(shape.num_chips());
    if !shape.is_active(source) {
        table.resize(shape.num_chips(), RouteEntry::Sentinel);
        return table;
    }

    table.extend(shape.active_positions().map(|destination| RouteEntry::Route {
        destination,
        direction: shape.route(source, destination),
    }));
    table.resize(shape.num_chips(), RouteEntry::Sentinel);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_table_covers_every_chip() {
        let shape = SystemShape::torus(4, 4).unwrap();
        let table = generate_routing_table(&shape, Position::new(1, 2));
        assert_eq!(table.len(), 16);
        assert!(table.iter().all(|e| !e.is_sentinel()));
        for (i, entry) in table.iter().enumerate() {
            match entry {
                RouteEntry::Route { destination, .. } => assert_eq!(*destination, shape.position_at(i)),
                RouteEntry::Sentinel => unreachable!(),
            }
        }
    }

    #[test]
    fn own_entry_is_local() {
        let shape = SystemShape::torus(4, 4).unwrap();
        let source = Position::new(2, 3);
        let table = generate_routing_table(&shape, source);
        assert_eq!(
            table[shape.index_of(source)],
            RouteEntry::Route { destination: source, direction: Direction::Local }
        );
        let locals = table.iter().filter(|e| e.direction() == Some(Direction::Local)).count();
        assert_eq!(locals, 1);
    }

    #[test]
    fn board_table_pads_with_sentinels() {
        let shape = SystemShape::board(8, 8).unwrap();
        let table = generate_routing_table(&shape, Position::new(4, 3));
        assert_eq!(table.len(), 64);
        assert!(table[..48].iter().all(|e| !e.is_sentinel()));
        assert!(table[48..].iter().all(RouteEntry::is_sentinel));
    }

    #[test]
    fn absent_chip_table_is_all_sentinels() {
        let shape = SystemShape::board(8, 8).unwrap();
        let table = generate_routing_table(&shape, Position::new(7, 0));
        assert_eq!(table, vec![RouteEntry::Sentinel; 64]);
    }

    #[test]
    fn neighbours_route_directly() {
        let shape = SystemShape::torus(8, 8).unwrap();
        let source = Position::new(3, 3);
        let table = generate_routing_table(&shape, source);
        for dir in Direction::LINKS {
            let neighbour = source.step(dir);
            assert_eq!(table[shape.index_of(neighbour)].direction(), Some(dir));
        }
    }
}
