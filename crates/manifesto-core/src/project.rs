//! MSBuild project files as a source of files to scan.
//!
//! A project lists its sources as `Compile` items. An optional overlay next
//! to it, named `<project>.overlay`, adjusts that list and pulls in other
//! projects:
//!
//! ```xml
//! <SccBuild>
//!   <Compile Include="Generated/Extra.cs" />
//!   <Compile Exclude="Forms/Main.Designer.cs" />
//!   <Import Include="Child/Child.csproj" />
//! </SccBuild>
//! ```
//!
//! Elements are matched by local name whatever their namespace. Item paths
//! are relative to the directory of the project naming them, and `\` is read
//! as a separator. An `Include` may hold several paths separated by `;`.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Extension appended to a project path to find its overlay.
pub const OVERLAY_EXTENSION: &str = "overlay";

/// Errors raised while reading a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// A project file could not be read.
    #[error("Failed to read project file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A project or overlay is not well-formed XML.
    #[error("Failed to parse {path}: {source}")]
    Xml {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying parse error.
        source: roxmltree::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Overlay {
    include: Vec<String>,
    exclude: Vec<String>,
    imports: Vec<String>,
}

/// A project file together with its overlay.
#[derive(Debug, Clone)]
pub struct ProjectFile {
    path: PathBuf,
    dir: PathBuf,
    compile: Vec<String>,
    overlay: Overlay,
}

impl ProjectFile {
    /// Reads the project at `path` and its overlay, if there is one.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be read, or if the project or
    /// an existing overlay is not well-formed.
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        let text = read(path)?;
        let compile = parse(path, &text, |doc| items(doc, "Compile", "Include"))?;

        let overlay_path = overlay_path(path);
        let overlay = match std::fs::read_to_string(&overlay_path) {
            Ok(text) => parse(&overlay_path, &text, |doc| Overlay {
                include: items(doc, "Compile", "Include"),
                exclude: items(doc, "Compile", "Exclude"),
                imports: items(doc, "Import", "Include"),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No overlay for {}", path.display());
                Overlay::default()
            }
            Err(source) => {
                return Err(ProjectError::Io {
                    path: overlay_path,
                    source,
                })
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            dir: path.parent().map_or_else(PathBuf::new, Path::to_path_buf),
            compile,
            overlay,
        })
    }

    /// Path of the project file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the files to scan, in project order followed by the files of
    /// each imported project.
    ///
    /// Overlay includes follow the project's own items. Overlay excludes
    /// remove every matching item. A project imported twice is read once.
    ///
    /// # Errors
    ///
    /// Returns an error if an imported project cannot be read.
    pub fn files_to_include(&self) -> Result<Vec<PathBuf>, ProjectError> {
        let mut visited = HashSet::from([identity(&self.path)]);
        let mut files = Vec::new();
        self.collect(&mut files, &mut visited)?;
        Ok(files)
    }

    fn collect(
        &self,
        files: &mut Vec<PathBuf>,
        visited: &mut HashSet<PathBuf>,
    ) -> Result<(), ProjectError> {
        files.extend(
            self.compile
                .iter()
                .chain(&self.overlay.include)
                .filter(|item| !self.overlay.exclude.contains(item))
                .map(|item| self.dir.join(item)),
        );

        for import in &self.overlay.imports {
            let child = self.dir.join(import);
            if !visited.insert(identity(&child)) {
                warn!("Skipping repeated import of {}", child.display());
                continue;
            }
            debug!("Importing {}", child.display());
            Self::open(&child)?.collect(files, visited)?;
        }
        Ok(())
    }
}

fn overlay_path(project: &Path) -> PathBuf {
    let mut name = project.as_os_str().to_owned();
    name.push(".");
    name.push(OVERLAY_EXTENSION);
    PathBuf::from(name)
}

fn identity(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn read(path: &Path) -> Result<String, ProjectError> {
    std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T>(
    path: &Path,
    text: &str,
    extract: impl FnOnce(&roxmltree::Document<'_>) -> T,
) -> Result<T, ProjectError> {
    let doc = roxmltree::Document::parse(text).map_err(|source| ProjectError::Xml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract(&doc))
}

/// Values of `attribute` on every `element`, in document order.
fn items(doc: &roxmltree::Document<'_>, element: &str, attribute: &str) -> Vec<String> {
    doc.descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == element)
        .filter_map(|node| node.attribute(attribute))
        .flat_map(|value| value.split(';'))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.replace('\\', "/"))
        .collect()
}
