use favsync::resolver::{TitleNormalizer, resolve};
use favsync::types::{DestinationTrack, SourceTrack};

fn source(title: &str, duration: u32) -> SourceTrack {
    SourceTrack {
        id: "3135556".to_string(),
        title: title.to_string(),
        artist: "The Beatles".to_string(),
        duration,
    }
}

fn candidate(id: &str, title: &str, duration_ms: u64) -> DestinationTrack {
    DestinationTrack {
        id: id.to_string(),
        title: title.to_string(),
        artist: "The Beatles".to_string(),
        duration_ms,
    }
}

fn pick<'a>(src: &SourceTrack, candidates: &'a [DestinationTrack]) -> Option<&'a str> {
    resolve(&TitleNormalizer::new(), src, candidates).map(|c| c.id.as_str())
}

#[test]
fn test_empty_candidates() {
    assert_eq!(pick(&source("Hey Jude", 431), &[]), None);
}

#[test]
fn test_single_candidate_wins_regardless() {
    let candidates = vec![candidate("a", "Something Else Entirely", 1_000)];
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("a"));
}

#[test]
fn test_unique_name_match() {
    let candidates = vec![
        candidate("a", "Hey Jude - Live", 431_000),
        candidate("b", "hey jude", 180_000),
        candidate("c", "Jude", 431_000),
    ];
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("b"));
}

#[test]
fn test_bracket_free_title_matches() {
    let candidates = vec![
        candidate("a", "Hey Jude (Remastered 2015)", 431_000),
        candidate("b", "Hey Jude", 180_000),
    ];
    // Both titles match by name, one with and one without the suffix;
    // the duration decides
    assert_eq!(
        pick(&source("Hey Jude (Remastered 2015)", 431), &candidates),
        Some("a")
    );
}

#[test]
fn test_example_from_remaster_listing() {
    // Only the plain title matches by name, even though the remaster has the
    // right duration
    let candidates = vec![
        candidate("remaster", "Hey Jude (Remastered 2015)", 431_000),
        candidate("plain", "Hey Jude", 180_000),
    ];
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("plain"));
}

#[test]
fn test_duration_breaks_name_tie() {
    let candidates = vec![
        candidate("a", "Hey Jude", 180_000),
        candidate("b", "Hey Jude", 431_900),
        candidate("c", "Hey Jude", 240_000),
    ];
    // 431_900 ms truncates to 431 s
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("b"));
}

#[test]
fn test_several_duration_matches_fall_back_to_first_name_match() {
    let candidates = vec![
        candidate("x", "Other", 431_000),
        candidate("a", "Hey Jude", 431_000),
        candidate("b", "Hey Jude", 431_000),
    ];
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("a"));
}

#[test]
fn test_no_duration_match_falls_back_to_first_name_match() {
    let candidates = vec![
        candidate("x", "Other", 431_000),
        candidate("a", "Hey Jude", 100_000),
        candidate("b", "Hey Jude", 200_000),
    ];
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("a"));
}

#[test]
fn test_no_name_match_returns_first_candidate() {
    let candidates = vec![
        candidate("first", "Hey Jude - Remastered 2015", 431_000),
        candidate("second", "Hey Jude - Live", 431_000),
    ];
    assert_eq!(pick(&source("Hey Jude", 431), &candidates), Some("first"));
}

#[test]
fn test_case_insensitive_beyond_ascii() {
    let candidates = vec![
        candidate("a", "ÉTÉ INDIEN", 1_000),
        candidate("b", "Indian Summer", 1_000),
    ];
    assert_eq!(pick(&source("Été indien", 1), &candidates), Some("a"));
}

#[test]
fn test_strip_brackets() {
    let normalizer = TitleNormalizer::new();
    assert_eq!(normalizer.strip_brackets("Yesterday (Remastered 2009)"), "Yesterday");
    assert_eq!(normalizer.strip_brackets("  Help!  "), "Help!");
    // Greedy: everything between the first "(" and the last ")" goes
    assert_eq!(normalizer.strip_brackets("A (x) B (y)"), "A");
}
