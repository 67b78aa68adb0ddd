use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("langref_docs_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn excerpt_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("extract")
        .join("tests")
        .join("fixtures")
        .join("langref-excerpt.rst")
}

fn langref_docs(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_langref-docs"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run langref-docs")
}

/// Writes an executable stand-in for pandoc that emits one relative link per
/// rendered section.
#[cfg(unix)]
fn write_fake_pandoc(dir: &TempDir) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
while [ $# -gt 1 ]; do
  if [ "$1" = "--output" ]; then
    out="$2"
    shift
  fi
  shift
done
printf '<p><a href="LangRef.html#i-ret">ret</a> <a href="https://llvm.org/">llvm</a></p>\n' > "$out"
"#;
    let path = dir.join("fake-pandoc");
    fs::write(&path, script).expect("failed to write fake pandoc");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("failed to mark fake pandoc executable");
    path
}

#[test]
fn missing_renderer_exits_with_diagnostic() {
    let dir = TempDir::new("missing_renderer");
    fs::copy(excerpt_fixture(), dir.join("LangRef.rst")).unwrap();

    let out = langref_docs(&["--renderer", "langref-docs-no-such-renderer"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("error: 'langref-docs-no-such-renderer' was not found on PATH"),
        "stderr: {stderr}"
    );
    assert!(!dir.join("out").exists());
}

#[test]
fn missing_input_exits_with_diagnostic() {
    let dir = TempDir::new("missing_input");

    let out = langref_docs(&["--list"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to read 'LangRef.rst'"), "stderr: {stderr}");
}

#[test]
fn zero_jobs_is_rejected_as_usage_error() {
    let dir = TempDir::new("zero_jobs");
    fs::copy(excerpt_fixture(), dir.join("LangRef.rst")).unwrap();

    let out = langref_docs(&["--jobs", "0"], dir.path());

    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--jobs"), "stderr: {stderr}");
    assert!(!dir.join("out").exists());
}

#[test]
fn list_prints_ids_and_anchors_in_document_order() {
    let dir = TempDir::new("list");
    let fixture = excerpt_fixture();

    let out = langref_docs(&["--list", "--input", fixture.to_str().unwrap()], dir.path());

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        [
            "ret\tret-instruction",
            "add\tadd-instruction",
            "fcmp\tfcmp-ordered-instruction",
            "fneg\tfneg-instruction",
        ]
    );
    assert!(!dir.join("out").exists());
}

#[test]
fn malformed_section_exits_without_bundle() {
    let dir = TempDir::new("malformed");
    fs::write(
        dir.join("LangRef.rst"),
        ".. _i_add:\n\n'``add``' Instruction\n^^^^^^^^^^\n\nSemantics:\n^^^^^^^^^^\n\n.. _end:\n",
    )
    .unwrap();

    let out = langref_docs(&["--list"], dir.path());

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains(".. _i_add:"), "stderr: {stderr}");
    assert!(!dir.join("out").join("LLVM.json").exists());
}

#[cfg(unix)]
#[test]
fn default_invocation_writes_bundle_under_out() {
    let dir = TempDir::new("default_run");
    fs::copy(excerpt_fixture(), dir.join("LangRef.rst")).unwrap();
    let renderer = write_fake_pandoc(&dir);

    let out = langref_docs(&["--renderer", renderer.to_str().unwrap()], dir.path());

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Wrote 4 instruction(s)"), "stdout: {stdout}");

    for id in ["ret", "add", "fcmp", "fneg"] {
        assert!(dir.join("out").join(format!("{id}.rst")).is_file());
        assert!(dir.join("out").join(format!("{id}.html")).is_file());
    }

    let raw = fs::read_to_string(dir.join("out").join("LLVM.json")).unwrap();
    let bundle: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(bundle.as_object().unwrap().len(), 4);
    let ret_at = raw.find("\"ret\"").unwrap();
    let fneg_at = raw.find("\"fneg\"").unwrap();
    assert!(ret_at < fneg_at);
    assert_eq!(
        bundle["add"].as_str().unwrap(),
        "<p><a href=\"https://releases.llvm.org/14.0.0/docs/LangRef.html#i-ret\">ret</a> <a href=\"https://llvm.org/\">llvm</a></p>\n"
    );
}

#[cfg(unix)]
#[test]
fn custom_base_url_and_bundle_name_are_honored() {
    let dir = TempDir::new("custom_flags");
    let renderer = write_fake_pandoc(&dir);
    let fixture = excerpt_fixture();
    let output = dir.join("docs");

    let out = langref_docs(
        &[
            "--input",
            fixture.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--bundle-name",
            "instructions.json",
            "--base-url",
            "https://llvm.org/docs/",
            "--renderer",
            renderer.to_str().unwrap(),
            "--jobs",
            "2",
            "--verbose",
        ],
        dir.path(),
    );

    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("fcmp => https://llvm.org/docs/LangRef.html#fcmp-ordered-instruction"),
        "stdout: {stdout}"
    );

    let html = fs::read_to_string(output.join("ret.html")).unwrap();
    assert!(html.contains("href=\"https://llvm.org/docs/LangRef.html#i-ret\""));
    assert!(output.join("instructions.json").is_file());
    assert!(!output.join("LLVM.json").exists());
}
