// src/watch/resolve.rs

//! Turning user-supplied watch paths into absolute glob patterns.
//!
//! Resolution is purely textual: nothing here touches the filesystem, so a
//! pattern for a file that does not exist yet resolves like any other and
//! simply never matches until the file shows up.

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Characters that turn a path component into a glob.
const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// One or more watch paths or globs, in the order the user gave them.
///
/// Accepts either a single string or a list, both from code and from TOML:
///
/// ```toml
/// paths = "app/views/**/*.erb"
/// # or
/// paths = ["app/views/**/*.erb", "app/components/**/*"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawWatchPaths")]
pub struct WatchPaths(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWatchPaths {
    One(String),
    Many(Vec<String>),
}

impl From<RawWatchPaths> for WatchPaths {
    fn from(raw: RawWatchPaths) -> Self {
        match raw {
            RawWatchPaths::One(path) => WatchPaths(vec![path]),
            RawWatchPaths::Many(paths) => WatchPaths(paths),
        }
    }
}

impl WatchPaths {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, path: impl Into<String>) {
        self.0.push(path.into());
    }
}

impl From<&str> for WatchPaths {
    fn from(path: &str) -> Self {
        WatchPaths(vec![path.to_string()])
    }
}

impl From<String> for WatchPaths {
    fn from(path: String) -> Self {
        WatchPaths(vec![path])
    }
}

impl From<Vec<String>> for WatchPaths {
    fn from(paths: Vec<String>) -> Self {
        WatchPaths(paths)
    }
}

impl From<Vec<&str>> for WatchPaths {
    fn from(paths: Vec<&str>) -> Self {
        WatchPaths(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for WatchPaths {
    fn from(paths: &[&str]) -> Self {
        WatchPaths(paths.iter().map(|p| p.to_string()).collect())
    }
}

/// Lexically normalize a path and render it with `/` separators.
///
/// - `.` components are dropped.
/// - `..` pops the previous component; at the filesystem root it is dropped,
///   in a relative path with nothing left to pop it is kept.
/// - Duplicate and trailing separators disappear.
///
/// Normalizing an already-normalized path returns it unchanged.
pub fn normalize_path(path: &Path) -> String {
    let mut prefix = String::new();
    let mut absolute = false;
    let mut parts: Vec<String> = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => {
                prefix = p.as_os_str().to_string_lossy().replace('\\', "/");
            }
            Component::RootDir => absolute = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }

    let body = parts.join("/");
    if absolute {
        format!("{prefix}/{body}")
    } else if body.is_empty() && prefix.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{body}")
    }
}

/// Resolve a single path or glob against `root` and normalize it.
///
/// Absolute inputs ignore `root`.
pub fn resolve(root: &Path, path: &str) -> String {
    normalize_path(&root.join(path))
}

/// Resolve every entry of `paths` against `root`, preserving order.
pub fn normalize_paths(root: &Path, paths: &WatchPaths) -> Vec<String> {
    paths.as_slice().iter().map(|p| resolve(root, p)).collect()
}

/// Figure out the absolute project root.
///
/// - An absolute configured root is used as-is.
/// - A relative one is taken relative to the current working directory.
/// - Without a configured root, the current working directory is the root.
pub fn resolve_root(root: Option<&Path>) -> PathBuf {
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match root {
        Some(root) if root.is_absolute() => root.to_path_buf(),
        Some(root) => cwd().join(root),
        None => cwd(),
    }
}

/// The normalized absolute patterns derived from a [`WatchPaths`] at server
/// start.
///
/// Every entry is an absolute, `/`-separated string usable as a glob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPathSet {
    root: PathBuf,
    patterns: Vec<String>,
}

impl ResolvedPathSet {
    /// `root` is expected to be absolute already (see [`resolve_root`]).
    pub fn resolve(root: &Path, paths: &WatchPaths) -> Self {
        Self {
            root: root.to_path_buf(),
            patterns: normalize_paths(root, paths),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// See [`watch_dirs`].
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        watch_dirs(&self.patterns)
    }
}

/// Directories to watch recursively so that every one of `patterns` sees
/// its files, with nested directories folded into their closest ancestor.
pub fn watch_dirs(patterns: &[String]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = patterns.iter().map(|p| glob_base(p)).collect();
    dirs.sort();
    dirs.dedup();

    let mut roots: Vec<PathBuf> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        if !roots.iter().any(|kept| dir.starts_with(kept)) {
            roots.push(dir);
        }
    }
    roots
}

/// Longest directory prefix of `pattern` that contains no glob syntax.
///
/// A pattern without any glob syntax names a single file, so its parent
/// directory is returned.
pub fn glob_base(pattern: &str) -> PathBuf {
    let path = Path::new(pattern);
    let mut base = PathBuf::new();
    let mut saw_glob = false;

    for component in path.components() {
        let is_glob = component
            .as_os_str()
            .to_str()
            .is_some_and(|s| s.contains(GLOB_META));
        if is_glob {
            saw_glob = true;
            break;
        }
        base.push(component);
    }

    if saw_glob {
        base
    } else {
        base.parent().map(Path::to_path_buf).unwrap_or(base)
    }
}
