//! Personal-name grammar.
//!
//! Accepted shapes, in terms of tokens:
//!
//! - a leading token of letters with at most one internal separator
//!   (apostrophe, typographic apostrophe, hyphen or period), e.g. `O'Malley`;
//! - optionally a comma-or-space separated given name starting uppercase,
//!   itself optionally followed by one more capitalised token
//!   (`Schneier, Bruce Wayne`);
//! - optionally an uppercase initial with a period, optionally followed by a
//!   capitalised token that may carry one hyphenated part (`John F. Kennedy`).
//!
//! Anything outside `[A-Za-z '’.,-]` never matches.

use std::sync::LazyLock;

use regex::Regex;

/// Upper bound on the length of a name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

static NAME_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^",
        // leading token: O'Malley, Cher, A.J
        r"[a-zA-Z][-'’.]?[a-zA-Z]+?",
        // given name(s): ", Bruce", " Bruce Wayne", " O’Malley-Smith"
        r"(?:[-'’.]?,?\s[A-Z][-'’.]?[a-zA-Z]+(?:[\s -]?[A-Z][a-zA-Z]+)?)?",
        // initial: " F.", " F. Kennedy", " J. Berners-Lee"
        r"(?:[-'’.]?,?\s[A-Z]\.(?:\s[A-Z][-'’.]?[a-zA-Z]+(?:-[A-Z][a-zA-Z]+)?)?)?",
        r"$",
    ))
    .expect("name grammar is a valid regex")
});

/// Returns `true` when `s` is an acceptable personal name.
pub fn is_valid_name(s: &str) -> bool {
    s.chars().count() <= MAX_NAME_CHARS && NAME_GRAMMAR.is_match(s)
}
