//! table-check: validate a word table produced by table-gen.
//!
//! Usage:
//!   table-check <file> <num_chips> [shape] [pattern] [--export] [--json]
//!
//! Exits 0 and prints a summary if the table is consistent; otherwise
//! prints the first broken invariant and exits 1.

use hexmesh_cli::{check_table, describe_summary, init_logging, CheckArgs};

fn print_usage() {
    eprintln!("table-check - Validate hexmesh routing and configuration tables");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  table-check <file> <num_chips> [shape] [pattern] [--export] [--json]");
    eprintln!();
    eprintln!("  shape     torus | board (default: board for 8x8, torus otherwise)");
    eprintln!("  pattern   cyclic | tornado | transpose | complement (default: cyclic)");
    eprintln!("  --export  write the router table of every block, present chip or");
    eprintln!("            not, to <file>.<x>.<y>");
    eprintln!("  --json    print the summary as JSON");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        print_usage();
        std::process::exit(if args.is_empty() { 1 } else { 0 });
    }

    init_logging();

    let parsed = match CheckArgs::parse(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let summary = match check_table(&parsed) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{}: {}", parsed.file.display(), e);
            std::process::exit(1);
        }
    };

    if parsed.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", describe_summary(&summary));
    }
    Ok(())
}
