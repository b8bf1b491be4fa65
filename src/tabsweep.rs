//! The matching algorithm used by the TabSweep tab list.
//!
//! A pattern matches when its characters appear in the choice, case-folded,
//! in the same order. Alignment is greedy: every pattern character takes the
//! earliest position still available, with no backtracking. The score of that
//! single alignment is the sum of:
//!
//! - `2 * n` for the n-th character of a run of adjacent matches (n >= 2),
//! - `10` when the choice's first character is matched,
//! - `5` for each match right after `.`, `-`, `_` or space,
//! - `max(0, 20 - length(choice))`.
//!
//! # Example:
//! ```edition2021
//! use tabsweep_matcher::FuzzyMatcher;
//! use tabsweep_matcher::tabsweep::TabSweepMatcher;
//!
//! let matcher = TabSweepMatcher::default();
//! assert_eq!(None, matcher.fuzzy_match("abc", "abx"));
//! assert_eq!(Some(34), matcher.fuzzy_match("abcdef", "abc"));
//!
//! let (score, indices) = matcher.fuzzy_indices("axbycz", "abc").unwrap();
//! assert_eq!(indices, [0, 2, 4]);
//! assert_eq!(score, 24);
//! ```
use crate::util::{cheap_matches, contains_upper, fold_chars};
use crate::{Error, FuzzyMatcher, IndexType, ScoreType};
use log::trace;
use std::cell::RefCell;
use std::cmp::max;
use std::fmt;
use std::str::FromStr;
use thread_local::ThreadLocal;

/// Score reported by [`score`] for a choice the pattern does not match.
pub const NO_MATCH: ScoreType = -1;

pub trait TabSweepScoreConfig: Send + Sync {
    /// Flat bonus for matching the first character of the choice.
    fn bonus_leading(&self) -> ScoreType;

    /// Flat bonus for a match right after a separator.
    fn bonus_separator(&self) -> ScoreType;

    /// The n-th character of a run of adjacent matches earns `n` times this.
    fn bonus_consecutive_step(&self) -> ScoreType;

    /// Choices shorter than this earn the difference as a bonus.
    fn length_bonus_cap(&self) -> ScoreType;

    fn is_separator(&self, ch: char) -> bool {
        matches!(ch, '.' | '-' | '_' | ' ')
    }
}

#[derive(Default, Copy, Clone, Debug)]
pub struct DefaultTabSweepScoreConfig {}

impl TabSweepScoreConfig for DefaultTabSweepScoreConfig {
    fn bonus_leading(&self) -> ScoreType {
        10
    }

    fn bonus_separator(&self) -> ScoreType {
        5
    }

    fn bonus_consecutive_step(&self) -> ScoreType {
        2
    }

    fn length_bonus_cap(&self) -> ScoreType {
        20
    }
}

#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum CaseMatching {
    Respect,
    Ignore,
    Smart,
}

impl FromStr for CaseMatching {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "respect" => Ok(CaseMatching::Respect),
            "ignore" => Ok(CaseMatching::Ignore),
            "smart" => Ok(CaseMatching::Smart),
            other => Err(Error::UnknownCaseMatching(other.to_string())),
        }
    }
}

impl fmt::Display for CaseMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseMatching::Respect => "respect",
            CaseMatching::Ignore => "ignore",
            CaseMatching::Smart => "smart",
        };
        f.write_str(name)
    }
}

pub struct TabSweepMatcher {
    case: CaseMatching,

    use_cache: bool,
    score_config: Box<dyn TabSweepScoreConfig>,

    c_cache: ThreadLocal<RefCell<Vec<(usize, char)>>>, // folded choice chars with their source index
    p_cache: ThreadLocal<RefCell<Vec<char>>>,          // folded pattern chars
}

impl Default for TabSweepMatcher {
    fn default() -> Self {
        Self {
            case: CaseMatching::Ignore,
            use_cache: true,
            score_config: Box::new(DefaultTabSweepScoreConfig::default()),
            c_cache: ThreadLocal::new(),
            p_cache: ThreadLocal::new(),
        }
    }
}

impl TabSweepMatcher {
    pub fn ignore_case(mut self) -> Self {
        self.case = CaseMatching::Ignore;
        self
    }

    pub fn smart_case(mut self) -> Self {
        self.case = CaseMatching::Smart;
        self
    }

    pub fn respect_case(mut self) -> Self {
        self.case = CaseMatching::Respect;
        self
    }

    pub fn case_matching(mut self, case: CaseMatching) -> Self {
        self.case = case;
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn score_config(mut self, score_config: Box<dyn TabSweepScoreConfig>) -> Self {
        self.score_config = score_config;
        self
    }

    fn is_case_sensitive(&self, pattern: &str) -> bool {
        match self.case {
            CaseMatching::Respect => true,
            CaseMatching::Ignore => false,
            CaseMatching::Smart => contains_upper(pattern),
        }
    }

    fn fuzzy(
        &self,
        choice: &str,
        pattern: &str,
        with_indices: bool,
    ) -> Option<(ScoreType, Vec<IndexType>)> {
        if pattern.is_empty() {
            return Some((0, Vec::new()));
        }

        let case_sensitive = self.is_case_sensitive(pattern);
        if !cheap_matches(choice, pattern, case_sensitive) {
            trace!("{:?} does not match {:?}", pattern, choice);
            return None;
        }

        let mut choice_chars = self
            .c_cache
            .get_or(|| RefCell::new(Vec::new()))
            .borrow_mut();
        let mut pattern_chars = self
            .p_cache
            .get_or(|| RefCell::new(Vec::new()))
            .borrow_mut();

        choice_chars.clear();
        choice_chars.extend(fold_chars(choice, case_sensitive));

        pattern_chars.clear();
        pattern_chars.extend(fold_chars(pattern, case_sensitive).map(|(_, ch)| ch));

        let num_choice_chars = choice.chars().count();
        let ret = greedy_score(
            &choice_chars,
            &pattern_chars,
            num_choice_chars,
            self.score_config.as_ref(),
            with_indices,
        );

        if !self.use_cache {
            // drop the allocated memory
            *choice_chars = Vec::new();
            *pattern_chars = Vec::new();
        }

        trace!(
            "{:?} matches {:?} with score {:?}",
            pattern,
            choice,
            ret.as_ref().map(|(score, _)| score)
        );
        ret
    }
}

impl FuzzyMatcher for TabSweepMatcher {
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, Vec<IndexType>)> {
        self.fuzzy(choice, pattern, true)
    }

    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy(choice, pattern, false).map(|(score, _)| score)
    }
}

/// Score the earliest-match alignment of `pattern` in `choice`.
///
/// `choice` holds folded chars with the index of the source char each came
/// from; positions used for scoring are positions in the folded sequence.
fn greedy_score(
    choice: &[(usize, char)],
    pattern: &[char],
    num_choice_chars: usize,
    config: &dyn TabSweepScoreConfig,
    with_indices: bool,
) -> Option<(ScoreType, Vec<IndexType>)> {
    let mut score: ScoreType = 0;
    let mut consecutive: ScoreType = 0;
    let mut prev_match_idx: Option<usize> = None;
    let mut pat_idx = 0;
    let mut indices: Vec<IndexType> = Vec::new();

    for (idx, &(source_idx, ch)) in choice.iter().enumerate() {
        if pat_idx == pattern.len() {
            break;
        }
        if ch != pattern[pat_idx] {
            continue;
        }

        if idx > 0 && prev_match_idx == Some(idx - 1) {
            consecutive += 1;
            score += consecutive * config.bonus_consecutive_step();
        } else {
            consecutive = 1;
        }

        if idx == 0 {
            score += config.bonus_leading();
        } else if config.is_separator(choice[idx - 1].1) {
            score += config.bonus_separator();
        }

        prev_match_idx = Some(idx);
        pat_idx += 1;

        let source_idx = source_idx as IndexType;
        if with_indices && indices.last() != Some(&source_idx) {
            indices.push(source_idx);
        }
    }

    if pat_idx < pattern.len() {
        return None;
    }

    score += max(0, config.length_bonus_cap() - num_choice_chars as ScoreType);
    Some((score, indices))
}

/// fuzzy match `line` with `pattern`, returning the score and indices of matches
pub fn fuzzy_indices(line: &str, pattern: &str) -> Option<(ScoreType, Vec<IndexType>)> {
    TabSweepMatcher::default().fuzzy_indices(line, pattern)
}

/// fuzzy match `line` with `pattern`, returning the score(the larger the better) on match
pub fn fuzzy_match(line: &str, pattern: &str) -> Option<ScoreType> {
    TabSweepMatcher::default().fuzzy_match(line, pattern)
}

/// Whether `pattern`'s chars occur in `text`, case-insensitively, in order.
pub fn matches(text: &str, pattern: &str) -> bool {
    cheap_matches(text, pattern, false)
}

/// Ranking score of `text` for `pattern`: non-negative on a match,
/// [`NO_MATCH`] otherwise, `0` for an empty pattern.
pub fn score(text: &str, pattern: &str) -> ScoreType {
    fuzzy_match(text, pattern).unwrap_or(NO_MATCH)
}
