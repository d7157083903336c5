// src/watch/patterns.rs

use std::fmt;
use std::path::{Component, Path};

use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::errors::Result;
use crate::watch::resolve::{glob_base, normalize_path, ResolvedPathSet};

/// Compiled glob predicate over a [`ResolvedPathSet`].
///
/// Patterns are absolute, so the watcher passes absolute event paths into
/// [`ReloadMatcher::matches`]. `*` and `?` never cross a `/`; only `**`
/// spans directories.
///
/// Below a pattern's literal base directory, wildcards do not match
/// dot-prefixed segments (`.git/`, `.home.html.swp`). Such a segment only
/// matches when the pattern spells out a segment starting with `.` for it.
#[derive(Clone)]
pub struct ReloadMatcher {
    patterns: Vec<String>,
    set: GlobSet,
    dot_rules: Vec<DotRule>,
}

/// Per-pattern dot-segment rule, indexed like the glob set.
#[derive(Clone)]
struct DotRule {
    /// Components of the literal base, including the root.
    base_len: usize,
    /// Pattern segments after the base that start with a literal `.`.
    explicit: Vec<GlobMatcher>,
}

impl DotRule {
    fn new(pattern: &str) -> Result<Self> {
        let base_len = glob_base(pattern).components().count();
        let mut explicit = Vec::new();
        for segment in segments_after(Path::new(pattern), base_len) {
            if segment.starts_with('.') {
                let glob = GlobBuilder::new(segment).literal_separator(true).build()?;
                explicit.push(glob.compile_matcher());
            }
        }
        Ok(Self { base_len, explicit })
    }

    fn admits(&self, candidate: &Path) -> bool {
        segments_after(candidate, self.base_len)
            .filter(|segment| segment.starts_with('.'))
            .all(|segment| self.explicit.iter().any(|glob| glob.is_match(segment)))
    }
}

fn segments_after(path: &Path, skip: usize) -> impl Iterator<Item = &str> {
    path.components().skip(skip).filter_map(|c| match c {
        Component::Normal(part) => part.to_str(),
        _ => None,
    })
}

impl fmt::Debug for ReloadMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadMatcher")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl ReloadMatcher {
    pub fn new(resolved: &ResolvedPathSet) -> Result<Self> {
        Self::from_patterns(resolved.patterns())
    }

    /// Build a matcher straight from already-normalized patterns.
    pub fn from_patterns(patterns: &[String]) -> Result<Self> {
        let dot_rules = patterns
            .iter()
            .map(|p| DotRule::new(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns: patterns.to_vec(),
            set: build_globset(patterns)?,
            dot_rules,
        })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if a change at `path` should trigger a refresh.
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        let candidate = normalize_path(path.as_ref());
        self.set
            .matches(candidate.as_str())
            .into_iter()
            .any(|idx| self.dot_rules[idx].admits(Path::new(&candidate)))
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = GlobBuilder::new(pat).literal_separator(true).build()?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
