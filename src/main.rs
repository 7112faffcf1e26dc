use album_index::types::{AlbumId, GalleryId};
use album_index::{config, gallery, output};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "album-index")]
#[command(about = "Build flattened descendant indexes for gallery album trees")]
#[command(long_about = "\
Build flattened descendant indexes for gallery album trees

Input is a JSON file listing every gallery's albums as (album, parent) edges.
The root album of a gallery has parent_id 0.

  {
    \"galleries\": [
      { \"gallery_id\": 1, \"albums\": [
          { \"album_id\": 1, \"parent_id\": 0 },
          { \"album_id\": 2, \"parent_id\": 1 },
          { \"album_id\": 3, \"parent_id\": 2 }
      ]}
    ]
  }

The index maps each album to itself plus all of its descendants:

  { \"galleries\": { \"1\": { \"1\": [1, 2, 3], \"2\": [2, 3], \"3\": [3] } } }

A config.toml next to the input file adjusts behaviour.
Run 'album-index gen-config' to print a documented one.
Set RUST_LOG (e.g. RUST_LOG=album_index=debug) to control logging.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml (default: the input file's directory)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Flatten every gallery and write the index as JSON
    Flatten {
        /// Galleries JSON file
        input: PathBuf,
        /// Write the index here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Validate every gallery and list excluded album edges
    Check {
        /// Galleries JSON file
        input: PathBuf,
    },
    /// Print an album and all of its descendants
    Subtree {
        /// Galleries JSON file
        input: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        gallery: GalleryId,
        #[arg(long, allow_negative_numbers = true)]
        album: AlbumId,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Flatten {
            input,
            output: out_path,
        } => {
            let settings = load_config_for(&input, cli.config_dir.as_deref())?;
            init_thread_pool(&settings.processing);
            let manifest = gallery::load_edges(&input)?;

            let outcomes = gallery::flatten_galleries(&manifest, &settings.flattener());
            output::print_flatten_summary(&outcomes);
            let index = gallery::IndexManifest::from_outcomes(outcomes)?;
            let json = index.to_json(settings.output.pretty)?;

            match out_path {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    info!(path = %path.display(), "index written");
                }
                None => println!("{}", json),
            }
        }
        Command::Check { input } => {
            let settings = load_config_for(&input, cli.config_dir.as_deref())?;
            init_thread_pool(&settings.processing);
            let manifest = gallery::load_edges(&input)?;

            // Excluded edges are listed in the output; don't also log them.
            let flattener = settings.flattener().with_excluded_logging(false);
            let outcomes = gallery::flatten_galleries(&manifest, &flattener);
            output::print_check_output(&outcomes);

            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            if failed > 0 {
                return Err(format!("{failed} of {} galleries failed", outcomes.len()).into());
            }
        }
        Command::Subtree {
            input,
            gallery: gallery_id,
            album,
        } => {
            let settings = load_config_for(&input, cli.config_dir.as_deref())?;
            let manifest = gallery::load_edges(&input)?;
            let edges = manifest.gallery(gallery_id)?;

            let index = settings
                .flattener()
                .flatten(&edges.albums)
                .map_err(|source| gallery::GalleryError::Flatten { gallery_id, source })?;
            let members = index
                .get(album)
                .ok_or_else(|| format!("Album {album} is not in gallery {gallery_id}'s index"))?;
            output::print_subtree(gallery_id, album, members);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the tracing subscriber, writing to stderr so stdout stays clean
/// for JSON output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "album_index=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load config from `--config-dir`, or from the directory holding `input`.
fn load_config_for(
    input: &Path,
    config_dir: Option<&Path>,
) -> Result<config::IndexConfig, config::ConfigError> {
    let dir = config_dir
        .or_else(|| input.parent())
        .unwrap_or_else(|| Path::new("."));
    config::load_config(dir)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    rayon::ThreadPoolBuilder::new()
        .num_threads(processing.worker_threads())
        .build_global()
        .ok();
}
