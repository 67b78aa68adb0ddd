//! Adapter for the external markup renderer.
//!
//! Rendering reStructuredText is delegated to an external converter
//! (`pandoc` by default). The converter is described by a
//! [`RendererConfig`] value handed to [`PandocRenderer`] at construction; no
//! state is shared between invocations.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

/// Errors raised while locating or running the renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer executable is not on `PATH`.
    #[error("'{program}' was not found on PATH; install it to render documentation")]
    MissingTool { program: String },

    /// The renderer could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The renderer exited unsuccessfully.
    #[error("'{program}' failed on '{}' ({status}): {stderr}", input.display())]
    Failed {
        program: String,
        input: PathBuf,
        status: String,
        stderr: String,
    },
}

/// Converts one markup file into one HTML file.
///
/// Implementations must be shareable across threads: sections are rendered
/// in parallel.
pub trait Renderer: Sync {
    /// Checks that the renderer can run at all. Called once, before any file
    /// is read or written.
    fn ensure_available(&self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Renders `input` into `output`, overwriting it.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

/// Invocation context for the external converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub program: String,
    /// Input markup format (`--from`).
    pub from: String,
    /// Output format (`--to`).
    pub to: String,
    /// Additional arguments placed before the input path.
    pub extra_args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
            from: "rst".to_string(),
            to: "html".to_string(),
            extra_args: vec!["--no-highlight".to_string()],
        }
    }
}

impl RendererConfig {
    /// Full argument list for one conversion.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--from".into(),
            self.from.as_str().into(),
            "--to".into(),
            self.to.as_str().into(),
        ];
        args.extend(self.extra_args.iter().map(OsString::from));
        args.push("--output".into());
        args.push(output.as_os_str().to_owned());
        args.push(input.as_os_str().to_owned());
        args
    }
}

/// Runs `pandoc` (or a compatible program) once per section.
#[derive(Debug, Clone, Default)]
pub struct PandocRenderer {
    config: RendererConfig,
}

impl PandocRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }
}

impl Renderer for PandocRenderer {
    fn ensure_available(&self) -> Result<(), RenderError> {
        match locate_program(&self.config.program) {
            Some(path) => {
                debug!(program = %path.display(), "Found renderer");
                Ok(())
            }
            None => Err(RenderError::MissingTool {
                program: self.config.program.clone(),
            }),
        }
    }

    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let program = &self.config.program;
        debug!(
            program = %program,
            input = %input.display(),
            output = %output.display(),
            "Rendering section"
        );

        let result = Command::new(program)
            .args(self.config.args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RenderError::MissingTool {
                    program: program.clone(),
                });
            }
            Err(e) => {
                return Err(RenderError::Spawn {
                    program: program.clone(),
                    source: e,
                });
            }
        };

        if !output.status.success() {
            return Err(RenderError::Failed {
                program: program.clone(),
                input: input.to_path_buf(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Finds `program` the way a shell would: a name containing a path separator
/// is checked directly, anything else is searched for on `PATH`.
pub fn locate_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return is_executable(direct).then(|| direct.to_path_buf());
    }

    let path_env = env::var_os("PATH")?;
    env::split_paths(&path_env)
        .flat_map(|dir| candidate_names(program).map(move |name| dir.join(name)))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidate_names(program: &str) -> impl Iterator<Item = String> + '_ {
    [String::new(), ".exe".to_string(), ".cmd".to_string()]
        .into_iter()
        .map(move |ext| format!("{program}{ext}"))
}

#[cfg(not(windows))]
fn candidate_names(program: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(program.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };

    metadata.is_file() && (metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
