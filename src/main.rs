use clap::{Parser, Subcommand};
use jpegfit::{config, output, process, scan};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "jpegfit")]
#[command(about = "Compress images to JPEG under a size budget")]
#[command(long_about = "\
Compress images to JPEG under a size budget

Every input is decoded, turned upright from its EXIF orientation, fitted
inside an optional bounding box and re-encoded as JPEG. With a target size
the highest quality in range that fits is chosen by binary search; without
one a fixed quality is used.

  jpegfit compress holiday/ extra.png --output out --target-kb 200 --max-width 1600

Outputs are named after their source ({stem}.jpg) and never overwrite an
existing file: photo.jpg, photo (1).jpg, photo (2).jpg, ...

Settings come from jpegfit.toml in the working directory (or --config),
overridden by command-line flags. Run 'jpegfit gen-config' for a documented
template.")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Flags for the compress command. Unset flags fall back to the config file.
#[derive(clap::Args)]
struct CompressArgs {
    /// Image files and/or directories (walked recursively)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Destination directory, created if missing
    #[arg(short, long)]
    output: PathBuf,

    /// Size budget in KB; 0 or less encodes at the fixed quality
    #[arg(long)]
    target_kb: Option<i64>,

    /// Maximum output width in pixels, 0 = unbounded
    #[arg(long)]
    max_width: Option<i64>,

    /// Maximum output height in pixels, 0 = unbounded
    #[arg(long)]
    max_height: Option<i64>,

    /// Config file (default: ./jpegfit.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write per-image results as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Compress images into a destination directory
    #[command(allow_negative_numbers = true)]
    Compress(CompressArgs),
    /// List the images a directory would contribute, in processing order
    List {
        /// Directory to walk
        dir: PathBuf,
    },
    /// Print a stock jpegfit.toml with all options documented
    GenConfig,
}

/// Build the log filter from `-v` and `RUST_LOG`.
///
/// Without `-v`, a non-empty `RUST_LOG` is used as-is. Otherwise this crate's
/// level comes from the verbosity count (errors only by default, since
/// per-item failures are already printed).
fn log_filter(verbosity: u8, rust_log: Option<&str>) -> EnvFilter {
    let rust_log = rust_log.map(str::trim).filter(|dirs| !dirs.is_empty());
    let builder = EnvFilter::builder();
    if let (0, Some(dirs)) = (verbosity, rust_log) {
        return builder.parse_lossy(dirs);
    }
    let level = match verbosity {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    builder.parse_lossy(rust_log.unwrap_or_default()).add_directive(
        format!("jpegfit={}", level)
            .parse()
            .unwrap_or_else(|_| level.into()),
    )
}

fn init_tracing(verbosity: u8) {
    let rust_log = std::env::var("RUST_LOG").ok();
    fmt()
        .with_env_filter(log_filter(verbosity, rust_log.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compress(args) => run_compress(args)?,
        Command::List { dir } => {
            let images = scan::list_images(&dir)?;
            output::print_listing(&dir, &images);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_compress(args: CompressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let working_dir = std::env::current_dir()?;
    let cfg = config::load_config(args.config.as_deref(), &working_dir)?;
    let options = process::CompressOptions::from_config(&cfg);

    let sources = scan::expand_inputs(&args.inputs);
    let requests = process::build_requests(
        &sources,
        &args.output,
        args.target_kb.unwrap_or(cfg.compression.target_kb),
        args.max_width.unwrap_or(cfg.resize.max_width),
        args.max_height.unwrap_or(cfg.resize.max_height),
    );

    let report = process::compress_batch(&requests, &options, |event| {
        output::print_event(&event)
    });
    output::print_summary(&report);

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&output::report_entries(&report))?;
        std::fs::write(path, json)?;
    }

    let failed = report.failure_count();
    if failed > 0 {
        return Err(format!("{} of {} images failed", failed, report.outcomes.len()).into());
    }
    Ok(())
}
