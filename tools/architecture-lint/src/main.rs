//! CLI entry point for the client layer lint.
//!
//! With no arguments the lint walks up from the current directory (or
//! `CARGO_WORKSPACE_DIR`) to the workspace root and checks `client/`. A single
//! path argument lints that client directory instead.

use std::env;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let outcome = client_dir(env::args_os().nth(1).map(PathBuf::from))
        .map_err(|err| err.to_string())
        .and_then(|dir| {
            architecture_lint::lint_client_sources(&dir).map_err(|err| err.to_string())
        });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(io::stderr().lock(), "{message}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WorkspaceNotFound;

impl fmt::Display for WorkspaceNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no Cargo.toml declaring [workspace] found above the working directory")
    }
}

impl std::error::Error for WorkspaceNotFound {}

fn client_dir(explicit: Option<PathBuf>) -> Result<PathBuf, WorkspaceNotFound> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    let candidates = [
        env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|start| workspace_root_above(start))
        .map(|root| root.join("client"))
        .ok_or(WorkspaceNotFound)
}

fn workspace_root_above(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|manifest| manifest.contains("[workspace]"))
        })
        .map(Path::to_path_buf)
}
