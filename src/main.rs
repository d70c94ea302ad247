use clap::{ArgAction, Parser, Subcommand};
use comicstrip::cache::CachedRenderer;
use comicstrip::compose::GlyphBackend;
use comicstrip::pipeline::PipelineEvent;
use comicstrip::render::{OpenAiClient, directory};
use comicstrip::{config, output, pipeline, script};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

/// Shared flags for commands that render panels.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Disable the render cache: request every panel again
    #[arg(long)]
    no_cache: bool,
}

/// Layout overrides applied on top of the config file.
#[derive(clap::Args, Clone, Default)]
struct LayoutArgs {
    /// Tiles per grid row
    #[arg(long)]
    panels_per_row: Option<u32>,

    /// Margin around each panel, in pixels
    #[arg(long)]
    border: Option<u32>,

    /// Caption font file (TTF/OTF)
    #[arg(long)]
    font: Option<PathBuf>,
}

impl LayoutArgs {
    /// The flags as a sparse config overlay, or `None` when none were given.
    fn overlay(&self) -> Option<toml::Value> {
        let mut layout = toml::Table::new();
        if let Some(n) = self.panels_per_row {
            layout.insert("panels_per_row".into(), toml::Value::Integer(n.into()));
        }
        if let Some(n) = self.border {
            layout.insert("border".into(), toml::Value::Integer(n.into()));
        }

        let mut font = toml::Table::new();
        if let Some(path) = &self.font {
            font.insert(
                "path".into(),
                toml::Value::String(path.display().to_string()),
            );
        }

        let mut root = toml::Table::new();
        if !layout.is_empty() {
            root.insert("layout".into(), toml::Value::Table(layout));
        }
        if !font.is_empty() {
            root.insert("font".into(), toml::Value::Table(font));
        }
        (!root.is_empty()).then_some(toml::Value::Table(root))
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("COMICSTRIP_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("COMICSTRIP_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "comicstrip")]
#[command(about = "Turn a short story into a captioned comic strip")]
#[command(long_about = "\
Turn a short story into a captioned comic strip

A text model breaks the story into a script, an image model renders each
panel, and the panels are laid out in a grid with their captions below.

Script format (what `parse` and `compose` read, and what `generate` asks for):

  Description: Watercolour, a boy in a yellow raincoat, a grey city.
  Panels:
  Panel Description 1: The boy stands at a bus stop in the rain.
  Caption 1: Another Monday.
  Panel Description 2: A paper boat floats past his boots.
  Caption 2: Then something small sailed by.

Pre-rendered panels for `compose` are ordered by numeric prefix:

  panels/
  ├── 001-bus-stop.png
  ├── 002-boat.png
  └── 010-harbour.jpg          # Non-contiguous numbering OK

The API key is read from OPENAI_API_KEY (see [service] in the config).
Run 'comicstrip gen-config' to generate a documented comic.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "comic.toml", global = true)]
    config: PathBuf,

    /// Directory for intermediate files (render cache)
    #[arg(long, default_value = ".comicstrip", global = true)]
    temp_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). With -v,
    /// `generate` also echoes the script text it received
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a script file and show its panels
    Parse {
        /// Script file, or - for stdin
        script: PathBuf,

        /// Print the parsed script as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a strip from a script and a directory of panel images
    Compose {
        /// Script file, or - for stdin
        script: PathBuf,

        /// Directory of NNN-name panel images
        panels: PathBuf,

        /// Output image (format from extension)
        #[arg(short, long, default_value = "comic_strip.png")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Run the full pipeline: story → script → panels → strip
    Generate {
        /// Story file, or - for stdin
        story: PathBuf,

        /// Output image (format from extension)
        #[arg(short, long, default_value = "comic_strip.png")]
        output: PathBuf,

        /// Also write the generated script to this file
        #[arg(long)]
        script_out: Option<PathBuf>,

        #[command(flatten)]
        cache: CacheArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Print a stock comic.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse { script, json } => {
            let parsed = script::parse_script(&read_input(&script)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                output::print_script(&parsed);
            }
        }
        Command::Compose {
            script,
            panels,
            output: out,
            layout,
        } => {
            let config = config::load_config(&cli.config, layout.overlay())?;
            init_thread_pool(&config.processing);
            let params = config.layout_params()?;
            let text = GlyphBackend::load(config.font.path.as_deref(), config.font.size)?;

            let parsed = script::parse_script(&read_input(&script)?);
            output::print_script(&parsed);
            output::print_panel_sources(&directory::panel_image_paths(&panels)?);
            let images = directory::load_panel_images(&panels)?;
            let rendered = pipeline::pair_panels(&parsed, images)?;

            let strip = with_printer(|tx| pipeline::compose(&rendered, &text, &params, Some(tx)))??;
            pipeline::save_comic(&strip, &out)?;
            println!("==> Saved {}", out.display());
        }
        Command::Generate {
            story,
            output: out,
            script_out,
            cache,
            layout,
        } => {
            let config = config::load_config(&cli.config, layout.overlay())?;
            init_thread_pool(&config.processing);
            let params = config.layout_params()?;
            let text = GlyphBackend::load(config.font.path.as_deref(), config.font.size)?;
            let client = OpenAiClient::from_env(&config.service)?;

            let cache_dir = cli.temp_dir.join("panels");
            let renderer = if cache.no_cache {
                CachedRenderer::write_only(&client, &cache_dir)
            } else {
                CachedRenderer::new(&client, &cache_dir)
            };

            let story = read_input(&story)?;
            let comic = with_printer(|tx| {
                pipeline::generate_comic(&story, &client, &renderer, &text, &params, Some(tx))
            })??;

            if let Some(path) = script_out {
                std::fs::write(&path, &comic.script_text)?;
            }
            if cli.verbose > 0 {
                output::print_script_text(&comic.script_text);
            }
            output::print_script(&comic.script);
            println!("Cache: {}", renderer.stats());
            pipeline::save_comic(&comic.strip, &out)?;
            println!("==> Saved {}", out.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Run `work` while a printer thread drains its progress events to stdout.
fn with_printer<T>(
    work: impl FnOnce(&Sender<PipelineEvent>) -> T,
) -> Result<T, Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = work(&tx);
    drop(tx);
    printer.join().map_err(|_| "output thread panicked")?;
    Ok(result)
}

/// Read a file, or stdin when the path is `-`.
fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
