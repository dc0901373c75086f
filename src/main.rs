//! # Matchgen CLI
//!
//! Command-line interface for compositing fixture graphics.
//!
//! ## Usage
//!
//! ```bash
//! # Composite a template with fixture data
//! matchgen compose --template-spec matchday.json --fixture fixture.json --out matchday.png
//!
//! # Use another base image and force the away layout
//! matchgen compose --template-spec matchday.json --fixture fixture.json \
//!     --template templates/away.png --home-away AWAY --out away.png
//!
//! # Show which font source a family resolves to
//! matchgen font Montserrat --size 48 --bold
//! ```
//!
//! Set `RUST_LOG` (or pass `-v`) for more detail on skipped elements and
//! font fallbacks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use matchgen::{
    CompositionEngine, EngineConfig, MatchgenError,
    render::RenderContext,
    template::{FixtureData, FontStyle, FontWeight, HomeAway, TemplateSpec},
};

/// Matchgen - fixture graphic compositor
#[derive(Parser, Debug)]
#[command(name = "matchgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (font fallbacks, fetches)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-fetch timeout in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Composite fixture data onto a template
    Compose {
        /// Template JSON: base image reference plus elements
        #[arg(long, value_name = "FILE")]
        template_spec: PathBuf,

        /// Fixture JSON: a match record or a plain key/value record
        #[arg(long, value_name = "FILE")]
        fixture: PathBuf,

        /// Output image path
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Base image reference (overrides the template's own)
        #[arg(long, value_name = "REF")]
        template: Option<String>,

        /// Home/away flag (overrides the fixture's own)
        #[arg(long, value_name = "HOME|AWAY")]
        home_away: Option<HomeAway>,
    },

    /// Resolve a font family and print where it came from
    Font {
        /// Font family, e.g. "Montserrat" or "Arial.ttf"
        family: String,

        /// Point size
        #[arg(long, default_value = "24")]
        size: f32,

        #[arg(long)]
        bold: bool,

        #[arg(long)]
        italic: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>, timeout_ms: Option<u64>) -> Result<EngineConfig, MatchgenError> {
    let mut config = match path {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(ms) = timeout_ms {
        config.fetch_timeout_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), MatchgenError> {
    let config = load_config(cli.config.as_ref(), cli.timeout_ms)?;

    match cli.command {
        Commands::Compose {
            template_spec,
            fixture,
            out,
            template,
            home_away,
        } => {
            let mut spec = TemplateSpec::from_json_file(&template_spec)?;
            if let Some(image) = template {
                spec.image = image;
            }

            let mut data = FixtureData::from_json(&std::fs::read_to_string(&fixture)?)?;
            if let Some(flag) = home_away {
                data.home_away = flag;
            }

            let engine = CompositionEngine::new(config)?;
            let composition = engine.compose_spec(&spec, &data).await?;

            for entry in &composition.report {
                println!("{}", entry);
            }
            std::fs::write(&out, &composition.bytes)?;
            println!(
                "Wrote {}x{} image to {} ({} painted, {} skipped)",
                composition.width,
                composition.height,
                out.display(),
                composition.painted_count(),
                composition.skipped().len()
            );
        }

        Commands::Font {
            family,
            size,
            bold,
            italic,
        } => {
            let ctx = RenderContext::http(config)?;
            let weight = if bold { FontWeight::Bold } else { FontWeight::Normal };
            let style = if italic { FontStyle::Italic } else { FontStyle::Normal };

            let font = ctx.fonts.resolve_styled(&family, weight, style, size).await;
            println!("{} ({:?}, {:?}) at {}px", family, weight, style, size);
            println!("  source:      {}", font.source());
            println!("  ascent:      {:.1}", font.ascent());
            println!("  line height: {:.1}", font.line_height());
            println!("  \"Matchday\":  {:.1}px wide", font.measure("Matchday", 0.0));
        }
    }

    Ok(())
}
