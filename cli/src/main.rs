use std::path::PathBuf;

use clap::Parser;
use langref_docs_extract::pipeline::{DEFAULT_BUNDLE_NAME, DEFAULT_INPUT, DEFAULT_OUTPUT_DIR};
use langref_docs_extract::{
    PandocRenderer, PipelineConfig, RendererConfig, links::DEFAULT_BASE_URL, list_instructions,
    run,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "langref-docs")]
#[command(version)]
#[command(about = "Extract per-instruction HTML documentation from the LLVM language reference")]
struct Cli {
    /// Language reference document to read.
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,
    /// Directory for per-instruction files and the bundle.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,
    /// File name of the bundle inside the output directory.
    #[arg(long, default_value = DEFAULT_BUNDLE_NAME)]
    bundle_name: String,
    /// Root URL that relative links are resolved against.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Renderer executable (name on PATH or path).
    #[arg(long, default_value = "pandoc")]
    renderer: String,
    /// Number of parallel renderer invocations, at least 1 (default: number of CPUs, at most 8).
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    jobs: Option<usize>,
    /// Print each instruction id and anchor without rendering anything.
    #[arg(long)]
    list: bool,
    /// Log per-instruction progress.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            input: self.input.clone(),
            output_dir: self.output.clone(),
            bundle_name: self.bundle_name.clone(),
            base_url: self.base_url.clone(),
            jobs: self.jobs,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = if cli.list {
        run_list(&cli)
    } else {
        run_extract(&cli)
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen here.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_list(cli: &Cli) -> Result<(), String> {
    let instructions = list_instructions(&cli.pipeline_config()).map_err(|e| e.to_string())?;
    for instruction in &instructions {
        println!("{}\t{}", instruction.id, instruction.anchor);
    }
    Ok(())
}

fn run_extract(cli: &Cli) -> Result<(), String> {
    let renderer = PandocRenderer::new(RendererConfig {
        program: cli.renderer.clone(),
        ..RendererConfig::default()
    });
    let outcome = run(&cli.pipeline_config(), &renderer).map_err(|e| e.to_string())?;

    if cli.verbose {
        for rendered in &outcome.instructions {
            println!(
                "  {} => {}",
                rendered.instruction.id, rendered.documentation_url
            );
        }
    }
    println!(
        "Wrote {} instruction(s) to {}",
        outcome.bundle.len(),
        outcome.bundle_path.display()
    );
    Ok(())
}
