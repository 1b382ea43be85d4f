//! table-gen: print the word table for a hexmesh system.
//!
//! Usage:
//!   table-gen <size> <shape> <pattern> [injection_rate consumption_delay router_timeout sample_period]
//!
//! Example:
//!   table-gen 8,8 board cyclic 16 10 50 60000 > board.table

use hexmesh_cli::{init_logging, GenArgs};
use hexmesh_tables::TableEncoder;

fn print_usage() {
    eprintln!("table-gen - Generate hexmesh routing and configuration tables");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  table-gen <size> <shape> <pattern> [rate delay timeout period]");
    eprintln!();
    eprintln!("  size     N, W,H or WxH");
    eprintln!("  shape    torus | board");
    eprintln!("  pattern  cyclic | tornado | transpose | complement");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  table-gen 8,8 board cyclic 16 10 50 60000");
    eprintln!();
    eprintln!("Environment (used when the four settings are omitted):");
    eprintln!("  HEXMESH_INJECTION_RATE     (default 16)");
    eprintln!("  HEXMESH_CONSUMPTION_DELAY  (default 10)");
    eprintln!("  HEXMESH_ROUTER_TIMEOUT     (default 50)");
    eprintln!("  HEXMESH_SAMPLE_PERIOD      (default 60000)");
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        std::process::exit(if args.is_empty() { 1 } else { 0 });
    }

    init_logging();

    let parsed = match GenArgs::parse(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let table = parsed
        .shape
        .with_size(parsed.width, parsed.height)
        .and_then(|shape| TableEncoder::new(shape, parsed.pattern, parsed.config))
        .and_then(|encoder| encoder.render());
    match table {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    tracing::info!(width = parsed.width, height = parsed.height, pattern = %parsed.pattern, "table written");
}
