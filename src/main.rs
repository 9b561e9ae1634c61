// ABOUTME: Main entry point for the finance-deck program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use finance_deck::{
    Config, DeckError, DeckPipeline, LlmProvider, PresentationType, Progress, TopicRequest,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a presentation for a topic
    Generate(GenerateArgs),

    /// Serve the JSON API for generating presentations
    Serve(ServeArgs),
}

#[derive(Args)]
struct BackendArgs {
    /// Language model provider (defaults to the first one with an API key)
    #[arg(long, value_enum)]
    provider: Option<LlmProvider>,

    /// Model name for the selected provider
    #[arg(long)]
    model: Option<String>,

    /// Maximum output tokens for the content request
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Number of parallel image lookups
    #[arg(long)]
    workers: Option<usize>,

    /// Directory for generated presentations
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Presentation topic
    #[arg(short, long)]
    topic: String,

    /// Number of content slides
    #[arg(short, long, default_value_t = 10)]
    slides: usize,

    /// Target audience
    #[arg(short, long)]
    audience: Option<String>,

    /// Storyline template to follow
    #[arg(long = "type", value_enum)]
    presentation_type: Option<PresentationType>,

    /// Path to output PPTX file
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the HTTP server
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    #[command(flatten)]
    backend: BackendArgs,
}

fn build_config(args: &BackendArgs) -> Result<Config, DeckError> {
    let mut config = Config::from_env()?;
    if args.provider.is_some() {
        config.provider = args.provider;
    }
    if args.model.is_some() {
        config.model = args.model.clone();
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_output_tokens = max_tokens;
    }
    if let Some(workers) = args.workers {
        config.media_workers = workers;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn print_progress(progress: &Progress) {
    match progress {
        Progress::GeneratingContent => println!("Generating slide content..."),
        Progress::ContentReady { slides } => println!("Content ready: {} slides", slides),
        Progress::ResolvingMedia { slide, total } => {
            println!("Resolved images: {}/{}", slide, total)
        }
        Progress::Rendering => println!("Creating PowerPoint..."),
        Progress::Finished { path } => println!("Presentation ready: {}", path.display()),
    }
}

fn run_generate(args: &GenerateArgs) -> anyhow::Result<()> {
    let config = build_config(&args.backend).context("Failed to load configuration")?;
    let pipeline = DeckPipeline::from_config(&config)?.with_observer(print_progress);

    let mut request = TopicRequest::new(args.topic.clone(), args.slides);
    if let Some(audience) = &args.audience {
        request = request.with_audience(audience.clone());
    }
    if let Some(presentation_type) = args.presentation_type {
        request = request.with_type(presentation_type);
    }

    pipeline.produce_to(&request, args.output.clone())?;
    Ok(())
}

fn run_serve(args: &ServeArgs) -> anyhow::Result<()> {
    let config = build_config(&args.backend).context("Failed to load configuration")?;
    let pipeline = DeckPipeline::from_config(&config)?;
    finance_deck::server::serve(pipeline, &args.host, args.port)
        .with_context(|| format!("HTTP server on port {} stopped", args.port))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Generate(args)) => {
            info!("Executing generate command...");
            run_generate(args)
        }
        Some(Commands::Serve(args)) => {
            info!("Executing serve command...");
            run_serve(args)
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        let kind = e
            .downcast_ref::<DeckError>()
            .map(|d| d.kind().as_str())
            .unwrap_or("internal");
        eprintln!("Error [{}]: {:#}", kind, e);
        std::process::exit(1);
    }
}
