//! Repo-local architectural lint for the vehicle client's hexagonal layout.
//!
//! `client/src` is split into the `domain` (records, ports, the manager
//! service) and `outbound` adapters, with `config` and the CLI binary wiring
//! them together. This crate parses every file under `domain/` and
//! `outbound/` and reports:
//!
//! - `domain` code reaching into `outbound` or `config`, or importing HTTP,
//!   settings, or CLI crates
//! - `outbound` code reaching into `config` or importing settings or CLI
//!   crates
//!
//! Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Library name of the linted crate, as it appears in absolute paths.
const CLIENT_CRATE: &str = "vehicle_client";

/// Crate-relative roots the lint understands.
const LAYER_ROOTS: [&str; 3] = ["domain", "outbound", "config"];

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    Io(io::Error),
    /// A source file could not be parsed or placed in a layer.
    Parse {
        /// File path relative to `client/src`.
        file: PathBuf,
        /// Parser or layout diagnostic.
        message: String,
    },
    /// One or more boundary violations were found.
    Violations(Vec<Violation>),
}

impl fmt::Display for ArchitectureLintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error while linting client layers: {err}"),
            Self::Parse { file, message } => {
                write!(f, "cannot lint {}: {message}", file.display())
            }
            Self::Violations(violations) => {
                writeln!(f, "{} layer boundary violation(s):", violations.len())?;
                violations
                    .iter()
                    .try_for_each(|violation| writeln!(f, "- {violation}"))
            }
        }
    }
}

impl std::error::Error for ArchitectureLintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse { .. } | Self::Violations(_) => None,
        }
    }
}

impl From<io::Error> for ArchitectureLintError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: PathBuf,
    /// Full file text.
    pub contents: String,
}

impl LintSource {
    /// Pair a relative path with its contents.
    pub fn new(file: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Lint the client crate sources on disk.
///
/// `client_dir` must be the `client/` directory at the repository root.
///
/// # Errors
///
/// Returns an error when sources cannot be read or parsed, or when any file
/// crosses a layer boundary.
pub fn lint_client_sources(client_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = client_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src_dir.join(layer.root());
        if dir.is_dir() {
            collect_sources_under(&src_dir, &dir, &mut sources)?;
        }
    }
    lint_sources(&sources)
}

/// Lint the provided sources. Paths must start with a layer directory.
///
/// # Errors
///
/// Returns an error when a source cannot be parsed or placed in a layer,
/// or when any file crosses a layer boundary.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| ArchitectureLintError::Parse {
            file: source.file.clone(),
            message: "file is not under domain/ or outbound/".to_owned(),
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(layer.check(&source.file, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// Linted layer, inferred from the first path component under `client/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Outbound,
}

impl Layer {
    const ALL: [Self; 2] = [Self::Domain, Self::Outbound];

    fn of(relative_path: &Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_os_str().to_str()?;
        Self::ALL.into_iter().find(|layer| layer.root() == first)
    }

    const fn root(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
        }
    }

    const fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["outbound", "config"],
            Self::Outbound => &["config"],
        }
    }

    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "actix_web",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
                "url",
            ],
            Self::Outbound => &["clap", "color_eyre", "ortho_config", "tracing_subscriber"],
        }
    }

    fn check(self, file: &Path, parsed: &syn::File) -> Vec<Violation> {
        let module = module_path_of(file);
        let mut collector = PathCollector::default();
        collector.visit_file(parsed);

        let mut messages = BTreeSet::new();
        for segments in &collector.paths {
            if let Some(target) = internal_root(&module, segments)
                .filter(|root| self.forbidden_modules().contains(root))
            {
                messages.insert(format!(
                    "{} code must not depend on crate::{target}",
                    self.root()
                ));
            }
            if let Some(name) = external_root(segments)
                .filter(|root| self.forbidden_crates().contains(root))
            {
                messages.insert(format!(
                    "{} code must not depend on external crate `{name}`",
                    self.root()
                ));
            }
        }

        messages
            .into_iter()
            .map(|message| Violation {
                file: file.to_path_buf(),
                message,
            })
            .collect()
    }
}

fn is_relative_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Module path of a source file, e.g. `outbound/http/mod.rs` becomes
/// `["outbound", "http"]`.
fn module_path_of(file: &Path) -> Vec<String> {
    let mut path: Vec<String> = file
        .with_extension("")
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    if path.last().is_some_and(|last| last == "mod") {
        path.pop();
    }
    path
}

/// Top-level crate module a path resolves into, if it is crate-internal.
///
/// Paths starting with a plain name resolve inside the current module and
/// never leave its layer, so only anchored paths are resolved.
fn internal_root<'a>(module: &'a [String], segments: &'a [String]) -> Option<&'a str> {
    let first = segments.first()?.as_str();
    let root = match first {
        "crate" => segments.get(1).map(String::as_str),
        _ if first == CLIENT_CRATE => segments.get(1).map(String::as_str),
        "self" => module.first().map(String::as_str),
        "super" => {
            let depth = segments.iter().take_while(|segment| *segment == "super").count();
            if depth < module.len() {
                module.first().map(String::as_str)
            } else {
                segments.get(depth).map(String::as_str)
            }
        }
        _ => None,
    };
    root.filter(|root| LAYER_ROOTS.contains(root))
}

fn external_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    (!is_relative_segment(root) && root != CLIENT_CRATE).then_some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        let segments: Vec<_> = node
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_sources_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries = fs::read_dir(current)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_sources_under(src_root, &path, sources)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource::new(relative, contents));
    }
    Ok(())
}
