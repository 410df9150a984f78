//! Conflict resolution between destination catalog candidates.
//!
//! A search on the destination catalog usually returns several tracks for a
//! single favourite: remasters, live versions, covers, compilations. The
//! resolver picks one of them with a short cascade of title and duration
//! checks. It is a best-effort heuristic; a wrong pick is possible and
//! acceptable for a personal migration.

use regex::Regex;

use crate::types::{DestinationTrack, SourceTrack};

/// Strips parenthesized suffixes such as `(Remastered 2009)` from titles.
///
/// Compiled once at start-up and shared by reference between the resolver
/// and the search query cascade.
#[derive(Debug, Clone)]
pub struct TitleNormalizer {
    brackets: Regex,
}

impl Default for TitleNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TitleNormalizer {
    pub fn new() -> Self {
        TitleNormalizer {
            // greedy: "A (x) B (y)" loses everything from the first "(" to the last ")"
            brackets: Regex::new(r"\(.*\)").expect("static pattern compiles"),
        }
    }

    /// Title without any parenthesized part, trimmed of surrounding spaces.
    pub fn strip_brackets(&self, title: &str) -> String {
        self.brackets.replace_all(title, "").trim_matches(' ').to_string()
    }
}

/// Picks the single best destination candidate for `source`.
///
/// Cascade, first rule that yields exactly one track wins:
/// 1. a single candidate is returned as is
/// 2. candidates whose title equals the source title, with or without its
///    parenthesized suffix (case-insensitive)
/// 3. among those, candidates whose duration in whole seconds equals the
///    source duration
/// 4. several title matches: the first of them, in search order
/// 5. otherwise the first candidate overall
///
/// Returns `None` only for an empty candidate list.
pub fn resolve<'a>(
    normalizer: &TitleNormalizer,
    source: &SourceTrack,
    candidates: &'a [DestinationTrack],
) -> Option<&'a DestinationTrack> {
    if candidates.len() == 1 {
        return candidates.first();
    }

    let source_title = source.title.to_lowercase();
    let bare_title = normalizer.strip_brackets(&source.title).to_lowercase();

    let matching_name: Vec<&DestinationTrack> = candidates
        .iter()
        .filter(|c| {
            let title = c.title.to_lowercase();
            title == source_title || title == bare_title
        })
        .collect();
    if matching_name.len() == 1 {
        return Some(matching_name[0]);
    }

    let matching_duration: Vec<&DestinationTrack> = matching_name
        .iter()
        .copied()
        .filter(|c| c.duration_ms / 1000 == u64::from(source.duration))
        .collect();
    if matching_duration.len() == 1 {
        return Some(matching_duration[0]);
    }

    if matching_name.len() > 1 {
        return Some(matching_name[0]);
    }

    candidates.first()
}
