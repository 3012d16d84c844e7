use anyhow::{Context, Result};
use chartshape::{build_chart, read_table, AggregationMode, ChartConfig, InputFormat};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chartshape")]
#[command(about = "Shape tabular data into chart-ready JSON", long_about = None)]
struct Args {
    /// Mapping pipeline (e.g., 'labels(0) | values(1, 2) | aggregate(sum)')
    mapping: Option<String>,

    /// Chart configuration JSON file; the mapping pipeline overrides it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the table from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Input encoding
    #[arg(short, long, value_enum, default_value_t = InputFormat::Csv)]
    format: InputFormat,

    /// Aggregation mode (none, sum, average, count)
    #[arg(short, long)]
    aggregate: Option<AggregationMode>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Log to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    // RUST_LOG, when set, refines the -v level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => ChartConfig::from_path(path)?,
        None => ChartConfig::default(),
    };

    // Parse the mapping pipeline
    if let Some(dsl) = &args.mapping {
        let spec = match chartshape::parser::parse_mapping(dsl) {
            Ok(spec) => spec,
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(1);
            }
        };
        config.apply(spec);
    }
    if let Some(mode) = args.aggregate {
        config.aggregation = mode;
    }

    // Read the table from the file or stdin
    let table = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input '{}'", path.display()))?;
            read_table(file, args.format)
        }
        None => read_table(io::stdin().lock(), args.format),
    }
    .context("Failed to read table")?;

    log::info!(
        "read {} data rows; mapping {:?}, aggregation {}",
        table.data_rows().len(),
        config.mapping,
        config.aggregation
    );

    let output = build_chart(&table, &config);

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialize chart output")?;

    // Write JSON to stdout
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json).context("Failed to write output to stdout")?;
    handle.flush().context("Failed to flush stdout")?;

    Ok(())
}
