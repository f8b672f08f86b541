//! List name resolution
//!
//! Users rarely type a list name exactly as it appears in the file. The
//! resolver maps a requested name onto an existing one: exact match first,
//! then case-insensitive, then the closest candidate by normalized edit
//! distance. Matches below [`SIMILARITY_THRESHOLD`] are rejected rather than
//! guessed.

/// Minimum normalized similarity for a fuzzy match to be accepted
pub const SIMILARITY_THRESHOLD: f64 = 0.6;

/// Result of resolving a requested list name against existing names
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// The requested name is present verbatim
    Exact(String),
    /// Present when compared case-insensitively
    CaseInsensitive(String),
    /// Closest candidate at or above the similarity threshold
    Fuzzy(String, f64),
    /// No candidate was close enough
    NotFound,
}

impl Match {
    /// Returns the canonical candidate name, if any was usable
    pub fn name(&self) -> Option<&str> {
        match self {
            Match::Exact(name) | Match::CaseInsensitive(name) | Match::Fuzzy(name, _) => Some(name),
            Match::NotFound => None,
        }
    }
}

/// Resolves `requested` against `candidates` in priority order
///
/// Ties on fuzzy score break to the earliest candidate in insertion order.
pub fn resolve<'a>(requested: &str, candidates: impl IntoIterator<Item = &'a str>) -> Match {
    let candidates: Vec<&str> = candidates.into_iter().collect();

    if let Some(name) = candidates.iter().find(|c| **c == requested) {
        return Match::Exact(name.to_string());
    }

    let lowered = requested.to_lowercase();
    if let Some(name) = candidates.iter().find(|c| c.to_lowercase() == lowered) {
        return Match::CaseInsensitive(name.to_string());
    }

    let mut best: Option<(&str, f64)> = None;
    for candidate in &candidates {
        let score = similarity(&lowered, &candidate.to_lowercase());
        // strictly-greater keeps the earliest candidate on ties
        if best.is_none_or(|(_, high)| score > high) {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((name, score)) if score >= SIMILARITY_THRESHOLD => Match::Fuzzy(name.to_string(), score),
        _ => Match::NotFound,
    }
}

/// Normalized similarity in `[0, 1]` between two strings
///
/// `1.0` means equal, `0.0` means nothing in common. Pure function of its
/// inputs; case folding is the caller's concern.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Levenshtein distance, single-row dynamic programming
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}
