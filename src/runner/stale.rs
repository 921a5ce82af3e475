//! Staleness checks
//!
//! Decides whether a build step has to run by comparing modification times:
//! the newest matched source against the newest destination. Nothing is
//! cached between calls and file contents are never read.

use crate::error::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::time::SystemTime;

/// Options for expanding source patterns
#[derive(Debug, Clone)]
pub struct GlobOptions {
    /// Directory relative patterns and destinations are resolved against
    pub cwd: Option<PathBuf>,

    pub case_sensitive: bool,

    /// `*` and `?` never match `/`
    pub require_literal_separator: bool,

    /// Wildcards never match a leading `.`
    pub require_literal_leading_dot: bool,

    /// Matched paths to drop from the source set
    pub ignore: Vec<String>,
}

impl Default for GlobOptions {
    fn default() -> Self {
        GlobOptions {
            cwd: None,
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
            ignore: Vec::new(),
        }
    }
}

impl GlobOptions {
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(patterns.into_iter().map(Into::into));
        self
    }

    fn match_options(&self) -> glob::MatchOptions {
        glob::MatchOptions {
            case_sensitive: self.case_sensitive,
            require_literal_separator: self.require_literal_separator,
            require_literal_leading_dot: self.require_literal_leading_dot,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Glob pattern for a source, rooted at `cwd` when relative.
    ///
    /// `cwd` is escaped so metacharacters in the directory name match
    /// literally.
    fn source_pattern(&self, pattern: &str) -> String {
        match &self.cwd {
            Some(cwd) if Path::new(pattern).is_relative() => {
                let root = glob::Pattern::escape(&cwd.to_string_lossy());
                format!(
                    "{}{}{}",
                    root.trim_end_matches(MAIN_SEPARATOR),
                    MAIN_SEPARATOR,
                    pattern
                )
            }
            _ => pattern.to_string(),
        }
    }

    fn ignore_set(&self) -> Result<Option<GlobSet>> {
        if self.ignore.is_empty() {
            return Ok(None);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Some(builder.build()?))
    }

    fn is_ignored(&self, set: &GlobSet, path: &Path) -> bool {
        if set.is_match(path) {
            return true;
        }
        match &self.cwd {
            Some(cwd) => path
                .strip_prefix(cwd)
                .map(|relative| set.is_match(relative))
                .unwrap_or(false),
            None => false,
        }
    }
}

/// Whether any matched source is strictly newer than the newest destination.
///
/// A missing destination always means a rebuild. Sources that match nothing
/// count as older than everything, so an existing destination with no
/// matching sources is up to date. Equal timestamps are up to date.
pub fn needs_rebuild<S, D>(sources: S, destinations: D, options: &GlobOptions) -> Result<bool>
where
    S: IntoIterator,
    S::Item: AsRef<str>,
    D: IntoIterator,
    D::Item: AsRef<Path>,
{
    let destinations: Vec<PathBuf> = destinations
        .into_iter()
        .map(|d| options.resolve(d.as_ref()))
        .collect();

    let last_dest = match destination_state(&destinations)? {
        Destinations::Missing => return Ok(true),
        Destinations::Newest(time) => time,
    };

    let sources = expand_sources(sources, options)?;
    let last_src = last_modified(&sources)?;

    // `None` orders below every timestamp
    Ok(last_src > last_dest)
}

enum Destinations {
    Missing,
    /// `None` only for an empty destination list
    Newest(Option<SystemTime>),
}

fn destination_state(destinations: &[PathBuf]) -> Result<Destinations> {
    let mut last: Option<SystemTime> = None;
    for path in destinations {
        let modified = match fs::metadata(path) {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Destinations::Missing),
            Err(e) => return Err(e.into()),
        };
        last = last.max(Some(modified));
    }
    Ok(Destinations::Newest(last))
}

/// Expand source patterns in order, keeping the first occurrence of each
/// file. Directories matched by a pattern are skipped.
///
/// Patterns are matched as UTF-8 text. A `cwd` that is not valid UTF-8 is
/// converted lossily and then matches nothing.
pub fn expand_sources<S>(patterns: S, options: &GlobOptions) -> Result<Vec<PathBuf>>
where
    S: IntoIterator,
    S::Item: AsRef<str>,
{
    let match_options = options.match_options();
    let ignore = options.ignore_set()?;
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let resolved = options.source_pattern(pattern.as_ref());
        for entry in glob::glob_with(&resolved, match_options)? {
            let path = entry?;
            if path.is_dir() {
                continue;
            }
            if let Some(set) = &ignore {
                if options.is_ignored(set, &path) {
                    continue;
                }
            }
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Newest mtime among `paths`, `None` for an empty list
pub fn last_modified(paths: &[PathBuf]) -> Result<Option<SystemTime>> {
    let mut last: Option<SystemTime> = None;
    for path in paths {
        let modified = fs::metadata(path)?.modified()?;
        last = last.max(Some(modified));
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, time: SystemTime) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let file = File::create(path).unwrap();
        file.set_modified(time).unwrap();
    }

    fn base() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000)
    }

    fn at(secs: u64) -> SystemTime {
        base() + Duration::from_secs(secs)
    }

    #[test]
    fn test_missing_destination_forces_rebuild() {
        let dir = TempDir::new().unwrap();
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(needs_rebuild(["src/*.js"], ["dist/a.js"], &opts).unwrap());
    }

    #[test]
    fn test_one_missing_destination_of_many() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(1));
        touch(&dir.path().join("dist/a.js"), at(10));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(needs_rebuild(["src/*.js"], ["dist/a.js", "dist/b.js"], &opts).unwrap());
    }

    #[test]
    fn test_destination_newer_is_up_to_date() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(1));
        touch(&dir.path().join("src/b.js"), at(2));
        touch(&dir.path().join("dist/app.js"), at(3));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(!needs_rebuild(["src/*.js"], ["dist/app.js"], &opts).unwrap());
    }

    #[test]
    fn test_newer_source_needs_rebuild() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(1));
        touch(&dir.path().join("src/b.js"), at(5));
        touch(&dir.path().join("dist/app.js"), at(3));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(needs_rebuild(["src/*.js"], ["dist/app.js"], &opts).unwrap());
    }

    #[test]
    fn test_equal_times_are_up_to_date() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(4));
        touch(&dir.path().join("dist/a.js"), at(4));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(!needs_rebuild(["src/a.js"], ["dist/a.js"], &opts).unwrap());
    }

    #[test]
    fn test_newest_destination_counts() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(5));
        touch(&dir.path().join("dist/old.js"), at(1));
        touch(&dir.path().join("dist/new.js"), at(6));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(!needs_rebuild(["src/a.js"], ["dist/old.js", "dist/new.js"], &opts).unwrap());
    }

    #[test]
    fn test_no_matching_sources() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("dist/a.js"), at(1));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(!needs_rebuild(["src/**/*.ts"], ["dist/a.js"], &opts).unwrap());
    }

    #[test]
    fn test_multiple_patterns_flattened() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(1));
        touch(&dir.path().join("public/index.html"), at(9));
        touch(&dir.path().join("dist/index.html"), at(5));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(!needs_rebuild(["src/*.js"], ["dist/index.html"], &opts).unwrap());
        assert!(
            needs_rebuild(["src/*.js", "public/**/*"], ["dist/index.html"], &opts).unwrap()
        );
    }

    #[test]
    fn test_expand_dedupes_in_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(1));
        touch(&dir.path().join("src/b.js"), at(1));
        let opts = GlobOptions::default().with_cwd(dir.path());

        let files = expand_sources(["src/b.js", "src/*.js"], &opts).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("src/b.js"), dir.path().join("src/a.js")]
        );
    }

    #[test]
    fn test_ignore_patterns() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(1));
        touch(&dir.path().join("src/a.test.js"), at(9));
        touch(&dir.path().join("dist/a.js"), at(5));
        let opts = GlobOptions::default()
            .with_cwd(dir.path())
            .with_ignore(["**/*.test.js"]);

        assert!(!needs_rebuild(["src/*.js"], ["dist/a.js"], &opts).unwrap());
    }

    #[test]
    fn test_case_insensitive_matching() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/README.md"), at(1));
        let mut opts = GlobOptions::default().with_cwd(dir.path());

        opts.case_sensitive = false;
        let files = expand_sources(["src/*.MD"], &opts).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_empty_destinations_compare_against_sources() {
        let dir = TempDir::new().unwrap();
        let opts = GlobOptions::default().with_cwd(dir.path());
        let none: [&str; 0] = [];

        assert!(!needs_rebuild(["src/*.js"], none, &opts).unwrap());

        touch(&dir.path().join("src/a.js"), at(1));
        assert!(needs_rebuild(["src/*.js"], none, &opts).unwrap());
    }

    #[test]
    fn test_directories_are_not_sources() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("public/css/site.css"), at(1));
        touch(&dir.path().join("dist/index.html"), at(5));
        let opts = GlobOptions::default().with_cwd(dir.path());

        let files = expand_sources(["public/**/*"], &opts).unwrap();
        assert_eq!(files, vec![dir.path().join("public/css/site.css")]);
        assert!(!needs_rebuild(["public/**/*"], ["dist/index.html"], &opts).unwrap());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("dist/a.js"), at(1));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(needs_rebuild(["src/[.js"], ["dist/a.js"], &opts).is_err());
    }

    #[test]
    fn test_cwd_with_glob_metacharacters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("site[v2]");
        touch(&root.join("src/a.js"), at(9));
        touch(&root.join("dist/a.js"), at(2));
        let opts = GlobOptions::default().with_cwd(&root);

        let files = expand_sources(["src/*.js"], &opts).unwrap();
        assert_eq!(files, vec![root.join("src/a.js")]);
        assert!(needs_rebuild(["src/*.js"], ["dist/a.js"], &opts).unwrap());

        touch(&root.join("dist/a.js"), at(10));
        assert!(!needs_rebuild(["src/*.js"], ["dist/a.js"], &opts).unwrap());
    }

    #[test]
    fn test_ignore_under_bracketed_cwd() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("app(1)[x]");
        touch(&root.join("src/a.js"), at(1));
        touch(&root.join("src/a.test.js"), at(9));
        let opts = GlobOptions::default()
            .with_cwd(&root)
            .with_ignore(["src/*.test.js"]);

        let files = expand_sources(["src/*.js"], &opts).unwrap();
        assert_eq!(files, vec![root.join("src/a.js")]);
    }

    #[test]
    fn test_rebuild_then_up_to_date() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"), at(5));
        touch(&dir.path().join("dist/a.js"), at(2));
        let opts = GlobOptions::default().with_cwd(dir.path());

        assert!(needs_rebuild(["src/a.js"], ["dist/a.js"], &opts).unwrap());

        touch(&dir.path().join("dist/a.js"), at(6));
        assert!(!needs_rebuild(["src/a.js"], ["dist/a.js"], &opts).unwrap());
    }
}
