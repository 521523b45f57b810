use clap::{Parser, Subcommand};
use photo_resizer::config::{self, Config};
use photo_resizer::imaging::{Dimensions, InterpolationMode};
use photo_resizer::notify::Notification;
use photo_resizer::output;
use photo_resizer::resize::{self, Resizer};
use photo_resizer::scan::{self, FolderMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-resizer")]
#[command(about = "Batch image resizer with PNG output")]
#[command(long_about = "\
Batch image resizer with PNG output

Give it files and folders and a scale factor. Each image is resized by
the factor, both sides floored and rounded down to a multiple of the
unit, and written as PNG:

  photos/
  ├── dawn.jpg
  ├── dawn.scaled.png              # resized output (compound extension)
  ├── dusk.raw.tif
  ├── dusk.scaled.hqbc.png         # with --mode-extension
  └── scaled/                      # with --output scaled
      └── tiny.gif                 # copied with --copy-unresizable

Per-file outcomes:
  resized    written as PNG
  copied     not resizable, copied unchanged (--copy-unresizable)
  skipped    output already exists (use --overwrite)
  collision  output would replace the source file
  canceled   not resizable (same size, below min or above max)
  ignored    file name already carries a .scaled marker

Settings come from photo-resizer.toml in the working directory (or
--config FILE); flags override the file.

Run 'photo-resizer gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Log diagnostics to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize images by a scale factor
    Resize(ResizeArgs),
    /// Print a stock photo-resizer.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ResizeArgs {
    /// Files and folders to resize
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Scale factor (greater than 0, not 1, at most 100)
    #[arg(short, long)]
    scale: f64,

    /// Config file (default: photo-resizer.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interpolation mode
    #[arg(short, long)]
    mode: Option<InterpolationMode>,

    /// Round output sides down to a multiple of this
    #[arg(short, long)]
    unit: Option<u32>,

    /// Output directory; relative paths are resolved per source folder
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Smallest allowed result when shrinking, as WxH
    #[arg(long, value_name = "WxH")]
    min_size: Option<Dimensions>,

    /// Largest allowed result when enlarging, as WxH
    #[arg(long, value_name = "WxH")]
    max_size: Option<Dimensions>,

    /// Replace existing outputs
    #[arg(long)]
    overwrite: bool,

    /// Add the interpolation mode code to output names
    #[arg(long)]
    mode_extension: bool,

    /// Drop the .scaled marker from output names
    #[arg(long)]
    no_compound_extension: bool,

    /// Also process files whose names carry a .scaled marker
    #[arg(long)]
    include_scaled: bool,

    /// Copy files that cannot be resized into the output directory
    #[arg(long)]
    copy_unresizable: bool,

    /// How folders are expanded
    #[arg(long)]
    folders: Option<FolderMode>,

    /// Worker threads (capped at available cores)
    #[arg(short, long)]
    jobs: Option<usize>,
}

impl ResizeArgs {
    /// Layer command-line flags over the loaded config.
    ///
    /// Boolean flags only ever switch a setting away from its default, so
    /// an absent flag leaves the file's value alone.
    fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.resize.mode = mode;
        }
        if let Some(unit) = self.unit {
            config.resize.unit = unit;
        }
        if let Some(min) = self.min_size {
            config.resize.min_size = Some(min);
        }
        if let Some(max) = self.max_size {
            config.resize.max_size = Some(max);
        }
        if let Some(path) = &self.output {
            config.output.path = Some(path.clone());
        }
        if self.overwrite {
            config.output.overwrite = true;
        }
        if self.mode_extension {
            config.output.mode_extension = true;
        }
        if self.no_compound_extension {
            config.output.compound_extension = false;
        }
        if self.include_scaled {
            config.output.ignore_scaled = false;
        }
        if self.copy_unresizable {
            config.output.copy_unresizable = true;
        }
        if let Some(folders) = self.folders {
            config.input.folders = folders;
        }
        if let Some(jobs) = self.jobs {
            config.processing.max_processes = Some(jobs);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resize(args) => run_resize(&args)?,
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_resize(args: &ResizeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config::load_config(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    resize::validate_scale(args.scale)?;

    init_thread_pool(&config.processing);

    let sources = scan::collect_sources(&args.paths, config.input.folders)?;
    let resize_config = config.resize_config();
    println!(
        "{}",
        output::format_batch_header(sources.len(), args.scale, &resize_config)
    );

    let (tx, rx) = std::sync::mpsc::channel::<Notification>();
    let printer = std::thread::spawn(move || {
        for notification in rx {
            println!("{}", output::format_notification(&notification));
        }
    });

    // The resizer owns the sender; dropping it closes the channel.
    let result = {
        let resizer = Resizer::new(resize_config).with_sink(Some(Box::new(tx)));
        resizer.resize_batch(&sources, args.scale)
    };
    printer
        .join()
        .map_err(|_| "notification printer thread panicked")?;

    let summary = result?;
    println!("{}", output::format_batch_summary(&summary));
    Ok(())
}

/// Install the stderr diagnostics subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            tracing_subscriber::EnvFilter::new("debug")
        } else {
            tracing_subscriber::EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores; `--jobs` can lower it, not raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
