use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;

fn has_glob_meta(s: &str) -> bool {
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
}

/// Directory to start walking from: everything before the first glob meta-character,
/// cut back to the last path separator.
fn static_prefix_dir(pattern: &str) -> PathBuf {
    let end = pattern
        .find(['*', '?', '[', '{'])
        .unwrap_or(pattern.len());
    let prefix = &pattern[..end];
    let dir = &prefix[..prefix.rfind('/').map_or(0, |i| i + 1)];
    if dir.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(dir)
    }
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, String> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?
        .compile_matcher();

    let walker = WalkBuilder::new(static_prefix_dir(pattern))
        .git_ignore(true)
        .git_exclude(true)
        .hidden(false)
        .parents(true)
        .build();

    let mut matches = Vec::new();
    for dent in walker.flatten() {
        if !dent.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = dent.path();
        let relative = path.strip_prefix(".").unwrap_or(path);
        if matcher.is_match(path) || matcher.is_match(relative) {
            matches.push(relative.to_path_buf());
        }
    }
    matches.sort();
    Ok(matches)
}

/// Expand glob patterns in `inputs` into concrete file paths.
///
/// Literal paths are passed through untouched so that missing files surface as read
/// errors later. Patterns are walked in parallel (.gitignore-aware); the result keeps
/// input order and drops duplicates.
pub fn expand_input_globs(inputs: &[String]) -> Result<Vec<PathBuf>, String> {
    let expanded = inputs
        .par_iter()
        .map(|input| {
            if has_glob_meta(input) {
                expand_pattern(input)
            } else {
                Ok(vec![PathBuf::from(input)])
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    Ok(expanded
        .into_iter()
        .flatten()
        .filter(|p| seen.insert(p.clone()))
        .collect())
}

/// Splits `paths` into neutral resource files and culture-specific satellites.
pub fn partition_satellites(paths: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    paths
        .into_iter()
        .partition(|p| !resxgen::culture::is_satellite(Path::new(p)))
}
