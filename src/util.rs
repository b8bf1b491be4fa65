#[cfg(test)]
use crate::{FuzzyMatcher, IndexType, ScoreType};

/// Fold `ch` for comparison. Lower-casing may expand a char into several.
///
/// Final sigma folds like any other sigma, so the result does not depend on
/// where in a word the char sits.
#[inline]
pub fn fold_char(ch: char, case_sensitive: bool) -> impl Iterator<Item = char> {
    let (single, lowered) = if case_sensitive {
        (Some(ch), None)
    } else {
        (None, Some(ch.to_lowercase().map(fold_sigma)))
    };
    single.into_iter().chain(lowered.into_iter().flatten())
}

#[inline]
fn fold_sigma(ch: char) -> char {
    if ch == 'ς' {
        'σ'
    } else {
        ch
    }
}

/// Fold every char of `string`, paired with the index of the char it came from.
pub fn fold_chars(string: &str, case_sensitive: bool) -> impl Iterator<Item = (usize, char)> + '_ {
    string
        .chars()
        .enumerate()
        .flat_map(move |(idx, ch)| fold_char(ch, case_sensitive).map(move |folded| (idx, folded)))
}

/// Greedy earliest-match subsequence test, without allocating.
pub fn cheap_matches(choice: &str, pattern: &str, case_sensitive: bool) -> bool {
    let mut pat_iter = fold_chars(pattern, case_sensitive).map(|(_, ch)| ch).peekable();
    for (_, ch) in fold_chars(choice, case_sensitive) {
        match pat_iter.peek() {
            Some(&pat_ch) if pat_ch == ch => {
                pat_iter.next();
            }
            Some(_) => {}
            None => break,
        }
    }

    pat_iter.peek().is_none()
}

pub fn contains_upper(string: &str) -> bool {
    string.chars().any(char::is_uppercase)
}

#[cfg(test)]
pub fn wrap_matches(line: &str, indices: &[IndexType]) -> String {
    let mut ret = String::new();
    let mut peekable = indices.iter().peekable();
    for (idx, ch) in line.chars().enumerate() {
        let next_id = **peekable.peek().unwrap_or(&&(line.len() as IndexType));
        if next_id == (idx as IndexType) {
            ret.push_str(format!("[{}]", ch).as_str());
            peekable.next();
        } else {
            ret.push(ch);
        }
    }

    ret
}

#[cfg(test)]
fn filter_and_sort(
    matcher: &dyn FuzzyMatcher,
    pattern: &str,
    lines: &[&'static str],
) -> Vec<&'static str> {
    let mut lines_with_score: Vec<(ScoreType, &'static str)> = lines
        .iter()
        .map(|&s| (matcher.fuzzy_match(s, pattern).unwrap_or(-(1 << 62)), s))
        .collect();
    lines_with_score.sort_by_key(|(score, _)| -score);
    lines_with_score
        .into_iter()
        .map(|(_, string)| string)
        .collect()
}

#[cfg(test)]
pub fn assert_order(matcher: &dyn FuzzyMatcher, pattern: &str, choices: &[&'static str]) {
    let result = filter_and_sort(matcher, pattern, choices);

    if result != choices {
        // debug print
        println!("pattern: {}", pattern);
        for &choice in choices.iter() {
            if let Some((score, indices)) = matcher.fuzzy_indices(choice, pattern) {
                println!("{}: {:?}", score, wrap_matches(choice, &indices));
            } else {
                println!("NO MATCH for {}", choice);
            }
        }
    }

    assert_eq!(result, choices);
}
