//! Scope-local name uniqueness

use std::collections::HashSet;

use crate::error::ValidationError;

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Longest question code the code pattern accepts
pub const MAX_CODE_LENGTH: usize = 20;

/// Return `candidate` if no sibling uses it, otherwise the first free
/// `"{candidate} N"` for N = 2, 3, ...
pub fn unique_name<'a>(candidate: &str, scope: impl IntoIterator<Item = &'a str>) -> String {
    let taken: HashSet<&str> = scope.into_iter().collect();
    if !taken.contains(candidate) {
        return candidate.to_string();
    }

    (2usize..)
        .map(|n| format!("{} {}", candidate, n))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_else(|| unreachable!("suffix range is unbounded"))
}

/// Bounded variant of [`unique_name`]; gives up after `max_attempts` suffixes
pub fn try_unique_name<'a>(
    candidate: &str,
    scope: impl IntoIterator<Item = &'a str>,
    max_attempts: usize,
) -> Result<String, ValidationError> {
    resolve(candidate, scope, max_attempts, |n| format!("{} {}", candidate, n))
}

/// Like [`try_unique_name`] but without the space, so `age` becomes `age2`.
/// Question codes can't contain spaces and are at most [`MAX_CODE_LENGTH`]
/// characters, so a long base is shortened to make room for the suffix.
pub fn try_unique_code<'a>(
    candidate: &str,
    scope: impl IntoIterator<Item = &'a str>,
    max_attempts: usize,
) -> Result<String, ValidationError> {
    resolve(candidate, scope, max_attempts, |n| {
        let suffix = n.to_string();
        let keep = MAX_CODE_LENGTH.saturating_sub(suffix.len());
        let base: String = candidate.chars().take(keep).collect();
        format!("{}{}", base, suffix)
    })
}

fn resolve<'a>(
    candidate: &str,
    scope: impl IntoIterator<Item = &'a str>,
    max_attempts: usize,
    suffixed: impl Fn(usize) -> String,
) -> Result<String, ValidationError> {
    let taken: HashSet<&str> = scope.into_iter().collect();
    if !taken.contains(candidate) {
        return Ok(candidate.to_string());
    }

    (2..max_attempts.saturating_add(2))
        .map(suffixed)
        .find(|name| !taken.contains(name.as_str()))
        .ok_or_else(|| ValidationError::NameExhausted {
            candidate: candidate.to_string(),
            attempts: max_attempts,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_name_is_kept() {
        assert_eq!(unique_name("Stuff", ["Other", "Stuff 2"]), "Stuff");
    }

    #[test]
    fn test_suffixes_increment() {
        let mut scope: Vec<String> = Vec::new();
        for expected in ["Stuff", "Stuff 2", "Stuff 3"] {
            let name = unique_name("Stuff", scope.iter().map(String::as_str));
            assert_eq!(name, expected);
            scope.push(name);
        }
    }

    #[test]
    fn test_gap_is_filled() {
        assert_eq!(unique_name("Stuff", ["Stuff", "Stuff 3"]), "Stuff 2");
    }

    #[test]
    fn test_bounded_resolution_gives_up() {
        let err = try_unique_name("Stuff", ["Stuff", "Stuff 2", "Stuff 3"], 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NameExhausted { candidate: "Stuff".to_string(), attempts: 2 }
        );
        assert_eq!(try_unique_name("Stuff", ["Stuff", "Stuff 2"], 2).unwrap(), "Stuff 3");
    }

    #[test]
    fn test_codes_have_no_space() {
        assert_eq!(try_unique_code("age", ["age"], DEFAULT_MAX_ATTEMPTS).unwrap(), "age2");
        assert_eq!(try_unique_code("age", ["name"], DEFAULT_MAX_ATTEMPTS).unwrap(), "age");
    }

    #[test]
    fn test_long_codes_are_shortened_to_fit() {
        let code = "abcdefghijklmnopqrst";
        assert_eq!(try_unique_code(code, [code], 10).unwrap(), "abcdefghijklmnopqrs2");

        let taken: Vec<String> = std::iter::once(code.to_string())
            .chain((2..10).map(|n| format!("abcdefghijklmnopqrs{}", n)))
            .collect();
        let next = try_unique_code(code, taken.iter().map(String::as_str), 20).unwrap();
        assert_eq!(next, "abcdefghijklmnopqr10");
        assert_eq!(next.len(), MAX_CODE_LENGTH);
    }
}
