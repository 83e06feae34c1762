// ABOUTME: Include/exclude glob selection of package files.
// ABOUTME: Patterns match per path segment and may match at any depth.

use glob::{MatchOptions, Pattern};
use std::borrow::Cow;
use std::path::{Component, Path};
use thiserror::Error;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

/// Which way a pattern list selects files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Only files matching at least one pattern are selected.
    Include,
    /// Files matching any pattern, or with any path segment matching it, are dropped.
    Exclude,
}

#[derive(Debug, Clone)]
enum Segment {
    /// `**`: zero or more directories.
    AnyDepth,
    Glob(Pattern),
}

/// A single compiled pattern.
///
/// `*`, `?` and `[...]` never cross a `/`. Unless the pattern starts with
/// `/` or `./`, it may match starting at any directory below the root, so
/// `*.sh` selects `run.sh` as well as `bin/tools/run.sh`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    anchored: bool,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn new(raw: &str) -> Result<Self, PatternError> {
        let compile = |p: &str| {
            Pattern::new(p).map_err(|source| PatternError {
                pattern: raw.to_string(),
                source,
            })
        };

        let anchored = raw.starts_with('/') || raw.starts_with("./");
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(|s| match s {
                "**" => Ok(Segment::AnyDepth),
                _ => compile(s).map(Segment::Glob),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            anchored,
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern matches the path relative to the package root.
    pub fn matches_path(&self, relative: &Path) -> bool {
        let components = normal_components(relative);
        let components: Vec<&str> = components.iter().map(|c| &**c).collect();

        if self.anchored {
            return match_segments(&self.segments, &components);
        }

        (0..components.len()).any(|start| match_segments(&self.segments, &components[start..]))
    }

    /// Whether the pattern matches any single segment of the path.
    ///
    /// Only single-segment patterns can. A leading `./` or `/` and trailing
    /// slashes are ignored, so `node_modules/` and `./build` match directory
    /// names at any depth.
    pub fn matches_any_segment(&self, relative: &Path) -> bool {
        let [Segment::Glob(pattern)] = self.segments.as_slice() else {
            return false;
        };
        normal_components(relative)
            .iter()
            .any(|c| pattern.matches_with(c, MATCH_OPTIONS))
    }
}

fn normal_components(path: &Path) -> Vec<Cow<'_, str>> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect()
}

fn match_segments(segments: &[Segment], components: &[&str]) -> bool {
    match segments.split_first() {
        None => components.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=components.len()).any(|skip| match_segments(rest, &components[skip..]))
        }
        Some((Segment::Glob(pattern), rest)) => match components.split_first() {
            Some((head, tail)) => {
                pattern.matches_with(head, MATCH_OPTIONS) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// Decides which files under a package root go into the archive.
#[derive(Debug, Clone, Default)]
pub enum PatternMatcher {
    /// No patterns configured: every file is selected.
    #[default]
    All,
    Include(Vec<PathPattern>),
    Exclude(Vec<PathPattern>),
}

impl PatternMatcher {
    /// Compile a pattern list. An empty list selects everything.
    pub fn new<S: AsRef<str>>(mode: PatternMode, patterns: &[S]) -> Result<Self, PatternError> {
        let compiled = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(PathPattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        if compiled.is_empty() {
            return Ok(Self::All);
        }

        Ok(match mode {
            PatternMode::Include => Self::Include(compiled),
            PatternMode::Exclude => Self::Exclude(compiled),
        })
    }

    /// Compile a comma-separated pattern list such as `"*.sh, config/*.json"`.
    pub fn parse(mode: PatternMode, raw: &str) -> Result<Self, PatternError> {
        let patterns: Vec<&str> = raw.split(',').collect();
        Self::new(mode, &patterns)
    }

    pub fn mode(&self) -> Option<PatternMode> {
        match self {
            Self::All => None,
            Self::Include(_) => Some(PatternMode::Include),
            Self::Exclude(_) => Some(PatternMode::Exclude),
        }
    }

    pub fn patterns(&self) -> &[PathPattern] {
        match self {
            Self::All => &[],
            Self::Include(p) | Self::Exclude(p) => p,
        }
    }

    /// Whether a file, given by its path relative to the package root, is selected.
    pub fn is_selected(&self, relative: &Path) -> bool {
        match self {
            Self::All => true,
            Self::Include(patterns) => patterns.iter().any(|p| p.matches_path(relative)),
            Self::Exclude(patterns) => !patterns
                .iter()
                .any(|p| p.matches_path(relative) || p.matches_any_segment(relative)),
        }
    }
}
