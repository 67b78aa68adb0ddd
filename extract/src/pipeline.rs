//! End-to-end extraction run: read, segment, render, normalize, bundle.
//!
//! A run is all-or-nothing with respect to the bundle: sections are resolved
//! up front, rendering stops at the first failure, and the bundle file is
//! only written once every section has been rendered and normalized.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use langref_docs_core::{DocumentationBundle, Instruction, InstructionId, ValidationError};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::links::{DEFAULT_BASE_URL, normalize};
use crate::parser::{ParsedInstruction, parse_instructions};
use crate::render::{RenderError, Renderer};

/// Default language reference read by a run.
pub const DEFAULT_INPUT: &str = "LangRef.rst";

/// Default directory receiving per-instruction files and the bundle.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Default bundle file name.
pub const DEFAULT_BUNDLE_NAME: &str = "LLVM.json";

/// Typed error for an extraction run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The renderer is missing or failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// A section is malformed or two sections share an id.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Reading an input or intermediate file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Writing an output file failed.
    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// Bundle serialization failed.
    #[error("failed to serialize bundle: {0}")]
    Json(#[from] serde_json::Error),

    /// The rendering worker pool could not be created.
    #[error("failed to start rendering workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Language reference document.
    pub input: PathBuf,
    /// Directory for `<id>.rst`, `<id>.html` and the bundle.
    pub output_dir: PathBuf,
    /// File name of the bundle inside `output_dir`.
    pub bundle_name: String,
    /// Root that relative links are resolved against.
    pub base_url: String,
    /// Number of parallel renderer invocations. `None` and `Some(0)` both
    /// select the adaptive default.
    pub jobs: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            jobs: None,
        }
    }
}

impl PipelineConfig {
    pub fn bundle_path(&self) -> PathBuf {
        self.output_dir.join(&self.bundle_name)
    }
}

/// Files produced for one instruction.
#[derive(Debug, Clone)]
pub struct RenderedInstruction {
    pub instruction: Instruction,
    pub rst_path: PathBuf,
    pub html_path: PathBuf,
    /// Link to the instruction in the published documentation.
    pub documentation_url: String,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Rendered instructions in document order.
    pub instructions: Vec<RenderedInstruction>,
    pub bundle: DocumentationBundle,
    pub bundle_path: PathBuf,
}

/// Runs the full extraction with `renderer`.
///
/// The renderer's availability is checked before the input is read.
pub fn run<R>(config: &PipelineConfig, renderer: &R) -> Result<RunOutcome, PipelineError>
where
    R: Renderer + ?Sized,
{
    renderer.ensure_available()?;

    let text = read_file(&config.input)?;
    let parsed = parse_instructions(&text)?;
    info!(
        input = %config.input.display(),
        instructions = parsed.len(),
        "Segmented language reference"
    );

    fs::create_dir_all(&config.output_dir).map_err(|source| PipelineError::Write {
        path: config.output_dir.clone(),
        source,
    })?;

    let jobs = config
        .jobs
        .filter(|jobs| *jobs > 0)
        .unwrap_or_else(|| default_parallel_jobs(parsed.len()));
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let rendered: Vec<(RenderedInstruction, String)> = pool.install(|| {
        parsed
            .par_iter()
            .map(|parsed| render_instruction(config, renderer, parsed))
            .collect::<Result<Vec<_>, PipelineError>>()
    })?;

    let (instructions, pairs): (Vec<RenderedInstruction>, Vec<(InstructionId, String)>) = rendered
        .into_iter()
        .map(|(rendered, html)| {
            let id = rendered.instruction.id.clone();
            (rendered, (id, html))
        })
        .unzip();
    let bundle = DocumentationBundle::assemble(pairs)?;

    let bundle_path = config.bundle_path();
    write_bundle(&bundle, &bundle_path)?;
    info!(
        bundle = %bundle_path.display(),
        instructions = bundle.len(),
        "Wrote documentation bundle"
    );

    Ok(RunOutcome {
        instructions,
        bundle,
        bundle_path,
    })
}

/// Segments and resolves the input without rendering anything.
pub fn list_instructions(config: &PipelineConfig) -> Result<Vec<Instruction>, PipelineError> {
    let text = read_file(&config.input)?;
    let parsed = parse_instructions(&text)?;
    Ok(parsed.into_iter().map(|parsed| parsed.instruction).collect())
}

fn render_instruction<R>(
    config: &PipelineConfig,
    renderer: &R,
    parsed: &ParsedInstruction<'_>,
) -> Result<(RenderedInstruction, String), PipelineError>
where
    R: Renderer + ?Sized,
{
    let id = &parsed.instruction.id;
    let rst_path = config.output_dir.join(format!("{id}.rst"));
    let html_path = config.output_dir.join(format!("{id}.html"));

    write_file(&rst_path, &parsed.section.to_text())?;
    renderer.render(&rst_path, &html_path)?;

    let raw_html = read_file(&html_path)?;
    let html = normalize(&raw_html, id, &config.base_url);
    write_file(&html_path, &html)?;

    let documentation_url = parsed.instruction.documentation_url(&config.base_url);
    debug!(
        instruction = %id,
        url = %documentation_url,
        "Rendered instruction"
    );

    Ok((
        RenderedInstruction {
            instruction: parsed.instruction.clone(),
            rst_path,
            html_path,
            documentation_url,
        },
        html,
    ))
}

/// Writes the bundle next to its final path and renames it into place, so a
/// bundle file on disk is always complete.
fn write_bundle(bundle: &DocumentationBundle, path: &Path) -> Result<(), PipelineError> {
    let raw = bundle.to_json_pretty()?;
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    write_file(&tmp_path, &raw)?;
    fs::rename(&tmp_path, path).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read_file(path: &Path) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), PipelineError> {
    fs::write(path, contents).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn default_parallel_jobs(section_count: usize) -> usize {
    let cpu_count = std::thread::available_parallelism()
        .map(|parallelism| parallelism.get())
        .unwrap_or(4);
    cpu_count.min(8).max(1).min(section_count.max(1))
}
