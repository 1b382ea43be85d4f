//! Shared plumbing for the `table-gen` and `table-check` binaries.

use std::path::{Path, PathBuf};

use hexmesh_tables::{
    read_table, ConfigError, NodeBlock, Result, ShapeKind, TableConfig, TableLayout,
    TableSummary, TableValidator, TrafficPattern,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr log subscriber, honouring `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexmesh_tables=warn,hexmesh_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn invalid(name: &'static str, value: &str) -> hexmesh_tables::Error {
    ConfigError::InvalidValue { name, value: value.to_string() }.into()
}

/// Parse a system size given as `N`, `W,H` or `WxH`.
pub fn parse_size(arg: &str) -> Result<(u32, u32)> {
    let parts: Vec<&str> = arg.split([',', 'x']).map(str::trim).collect();
    let parse = |s: &str| s.parse::<u32>().map_err(|_| invalid("system_size", arg));
    match parts.as_slice() {
        [n] => {
            let n = parse(n)?;
            Ok((n, n))
        }
        [w, h] => Ok((parse(w)?, parse(h)?)),
        _ => Err(invalid("system_size", arg)),
    }
}

/// Settings from the four trailing arguments, or from the environment if
/// none were given.
pub fn parse_settings(args: &[String]) -> Result<TableConfig> {
    let [rate, delay, timeout, period] = args else {
        if args.is_empty() {
            return TableConfig::from_env();
        }
        return Err(invalid("settings", &args.join(" ")));
    };
    let field = |name: &'static str, s: &String| s.parse::<u32>().map_err(|_| invalid(name, s));
    Ok(TableConfig {
        injection_rate: field("injection_rate", rate)?,
        consumption_delay: field("consumption_delay", delay)?,
        router_timeout: field("router_timeout", timeout)?,
        sample_period: field("sample_period", period)?,
    })
}

/// Everything `table-gen` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenArgs {
    pub width: u32,
    pub height: u32,
    pub shape: ShapeKind,
    pub pattern: TrafficPattern,
    pub config: TableConfig,
}

impl GenArgs {
    /// Parse `<size> <shape> <pattern> [rate delay timeout period]`.
    pub fn parse(args: &[String]) -> Result<Self> {
        let [size, shape, pattern, rest @ ..] = args else {
            return Err(invalid("arguments", &args.join(" ")));
        };
        let (width, height) = parse_size(size)?;
        Ok(Self {
            width,
            height,
            shape: shape.parse()?,
            pattern: pattern.parse()?,
            config: parse_settings(rest)?,
        })
    }
}

/// Everything `table-check` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckArgs {
    pub file: PathBuf,
    pub num_chips: usize,
    pub shape: Option<ShapeKind>,
    pub pattern: TrafficPattern,
    pub export: bool,
    pub json: bool,
}

impl CheckArgs {
    /// Parse `<file> <num_chips> [shape] [pattern] [--export] [--json]`.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut positional = Vec::new();
        let mut export = false;
        let mut json = false;
        for arg in args {
            match arg.as_str() {
                "--export" => export = true,
                "--json" => json = true,
                flag if flag.starts_with("--") => return Err(invalid("flag", flag)),
                _ => positional.push(arg.as_str()),
            }
        }

        let (file, num_chips, rest) = match positional.as_slice() {
            [file, num_chips, rest @ ..] if rest.len() <= 2 => (*file, *num_chips, rest),
            _ => return Err(invalid("arguments", &args.join(" "))),
        };
        Ok(Self {
            file: PathBuf::from(file),
            num_chips: num_chips.parse().map_err(|_| invalid("num_chips", num_chips))?,
            shape: rest.first().map(|s| s.parse()).transpose()?,
            pattern: match rest.get(1) {
                Some(p) => p.parse()?,
                None => TrafficPattern::Cyclic,
            },
            export,
            json,
        })
    }
}

/// Where `--export` writes the router table of chip `block`.
pub fn export_path(file: &Path, block: &NodeBlock<'_>) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(format!(".{}.{}", block.position.x, block.position.y));
    PathBuf::from(name)
}

/// Validate the table named by `args`, exporting router tables if asked.
///
/// With `--export` every block gets a file, present chip or not, so a
/// directory of exports always covers the whole bounding box.
pub fn check_table(args: &CheckArgs) -> Result<TableSummary> {
    let words = read_table(&args.file)?;
    let layout = TableLayout::of(&words, args.num_chips)?;

    let mut validator = TableValidator::new(args.num_chips).with_pattern(args.pattern);
    if let Some(kind) = args.shape {
        let size = layout.size as u32;
        validator = validator.with_shape(kind.with_size(size, size)?);
    }
    let summary = validator.validate(&words)?;

    if args.export {
        for block in layout.blocks(&words) {
            let path = export_path(&args.file, &block);
            std::fs::write(&path, block.format_spinnaker_table())?;
            tracing::debug!(path = %path.display(), "exported router table");
        }
        tracing::info!(files = layout.nodes, "router tables exported");
    }
    Ok(summary)
}

/// Human-readable summary of a valid table.
pub fn describe_summary(summary: &TableSummary) -> String {
    let mut out = format!(
        "Config Summary:\n  System: {} ({} chips, {} present)\n  Traffic: {}\n",
        summary.shape, summary.nodes, summary.active_nodes, summary.pattern
    );
    if let Some(s) = &summary.settings {
        out.push_str(&format!(
            "  Sample period: {}\n  Router timeout: {}\n  Injection rate: {}\n  Consumption delay: {}\n",
            s.sample_period, s.router_timeout, s.injection_rate, s.consumption_delay
        ));
    }
    out
}
