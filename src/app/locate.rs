use crate::app::error::{Error, Result};
use futures::future::BoxFuture;
use serde_derive::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tree_sitter::{Node, Parser};

const FUNCTION_KINDS: [&str; 2] = ["function_declaration", "method_declaration"];

/// Where a test function is declared, 1-based line and column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub file_name: String,
    pub line: usize,
    pub column: usize,
}

pub type LocationsByTest = HashMap<String, SourceLocation>;
pub type LocationsByPackage = HashMap<String, LocationsByTest>;

#[allow(dead_code)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ModuleDescriptor {
    pub path: String,
    pub dir: String,
    pub main: bool,
}

/// The subset of `go list -json` output the locator needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PackageDescriptor {
    pub dir: PathBuf,
    pub import_path: String,
    #[allow(dead_code)]
    pub name: String,
    #[allow(dead_code)]
    pub go_files: Vec<String>,
    pub test_go_files: Vec<String>,
    #[allow(dead_code)]
    pub module: Option<ModuleDescriptor>,
}

/// Resolves a package name into its descriptor.
pub trait PackageLookup: Send + Sync + 'static {
    fn lookup(&self, package: String) -> BoxFuture<'static, Result<PackageDescriptor>>;
}

/// Runs `go list -json <package>` (or whatever command is configured).
#[derive(Debug, Clone)]
pub struct GoList {
    program: String,
    args: Vec<String>,
}

impl GoList {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            Error::Configuration("lookup command must name a program".to_owned())
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl PackageLookup for GoList {
    fn lookup(&self, package: String) -> BoxFuture<'static, Result<PackageDescriptor>> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(&package)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Box::pin(async move {
            debug!("Looking up package {}", package);
            let output = command.output().await.map_err(|err| Error::Lookup {
                package: package.clone(),
                reason: err.to_string(),
            })?;
            if !output.status.success() {
                return Err(Error::Lookup {
                    package,
                    reason: format!(
                        "{}: {}",
                        output.status,
                        String::from_utf8_lossy(&output.stderr).trim()
                    ),
                });
            }
            serde_json::from_slice(&output.stdout).map_err(|err| Error::Lookup {
                package,
                reason: format!("malformed package description: {}", err),
            })
        })
    }
}

/// Manifest mode: reads a stream of package descriptors and parses the test
/// files of each of them.
pub fn locate_from_manifest(path: &Path) -> Result<LocationsByPackage> {
    let file = File::open(path).map_err(|source| Error::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let stream = serde_json::Deserializer::from_reader(BufReader::new(file))
        .into_iter::<PackageDescriptor>();
    let mut locations = LocationsByPackage::new();
    for (index, descriptor) in stream.enumerate() {
        let descriptor = descriptor.map_err(|source| Error::Manifest {
            path: path.to_path_buf(),
            index: index + 1,
            source,
        })?;
        let by_test = locate_in_package(&descriptor)?;
        locations.insert(descriptor.import_path, by_test);
    }
    info!("Loaded {} packages from {}", locations.len(), path.display());
    Ok(locations)
}

/// Discovery mode: one lookup task per package, at most `jobs` at a time.
/// The first failure aborts the remaining tasks and is returned.
pub async fn locate_by_lookup<L: PackageLookup>(
    lookup: Arc<L>,
    packages: &BTreeSet<String>,
    jobs: usize,
) -> Result<LocationsByPackage> {
    let permits = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();
    for package in packages {
        let lookup = lookup.clone();
        let permits = permits.clone();
        let package = package.clone();
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.map_err(|err| Error::Lookup {
                package: package.clone(),
                reason: err.to_string(),
            })?;
            let descriptor = lookup.lookup(package.clone()).await?;
            let by_test = tokio::task::spawn_blocking(move || locate_in_package(&descriptor))
                .await
                .map_err(|err| Error::Lookup {
                    package: package.clone(),
                    reason: err.to_string(),
                })??;
            Ok::<_, Error>((package, by_test))
        });
    }

    let mut locations = LocationsByPackage::with_capacity(packages.len());
    while let Some(joined) = tasks.join_next().await {
        match joined.map_err(Error::from).and_then(|inner| inner) {
            Ok((package, by_test)) => {
                trace!("Located {} functions in {}", by_test.len(), package);
                locations.insert(package, by_test);
            }
            Err(err) => {
                tasks.abort_all();
                return Err(err);
            }
        }
    }
    info!("Looked up {} packages", locations.len());
    Ok(locations)
}

/// Parses every test file of a package, later files overriding earlier ones
/// for functions declared twice.
pub fn locate_in_package(descriptor: &PackageDescriptor) -> Result<LocationsByTest> {
    trace!(
        "Parsing {} test files of {}",
        descriptor.test_go_files.len(),
        descriptor.import_path
    );
    let mut by_test = LocationsByTest::new();
    for file in &descriptor.test_go_files {
        let path = descriptor.dir.join(file);
        let source = std::fs::read_to_string(&path).map_err(|err| Error::Unparseable {
            path: path.clone(),
            reason: err.to_string(),
        })?;
        by_test.extend(parse_functions(&source, &path)?);
    }
    Ok(by_test)
}

/// Records every top-level function and method declaration of a Go file.
pub fn parse_functions(source: &str, path: &Path) -> Result<LocationsByTest> {
    let unparseable = |reason: String| Error::Unparseable {
        path: path.to_path_buf(),
        reason,
    };
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|err| unparseable(err.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| unparseable("parser produced no tree".to_owned()))?;
    let root = tree.root_node();
    if root.has_error() {
        return Err(unparseable(first_error_position(&root)));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut cursor = root.walk();
    let mut functions = LocationsByTest::new();
    for node in root.named_children(&mut cursor) {
        if !FUNCTION_KINDS.contains(&node.kind()) {
            continue;
        }
        let name = match node.child_by_field_name("name") {
            Some(name) => name,
            None => continue,
        };
        let name = name
            .utf8_text(source.as_bytes())
            .map_err(|err| unparseable(err.to_string()))?;
        let position = node.start_position();
        functions.insert(
            name.to_owned(),
            SourceLocation {
                file_name: file_name.clone(),
                line: position.row + 1,
                column: position.column + 1,
            },
        );
    }
    Ok(functions)
}

fn first_error_position(root: &Node) -> String {
    let mut cursor = root.walk();
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let position = node.start_position();
            return format!("syntax error at {}:{}", position.row + 1, position.column + 1);
        }
        let children: Vec<Node> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    "syntax error".to_owned()
}
