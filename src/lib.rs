//! Fuzzy matching for the TabSweep open-tab switcher.
//!
//! The core is a greedy, case-insensitive subsequence matcher with a small
//! heuristic scorer used to rank tab names as the user types:
//!
//! ```edition2021
//! use tabsweep_matcher::tabsweep::{matches, score};
//!
//! assert!(matches("TabManagerDialog", "tmd"));
//! assert!(!matches("TabManagerDialog", "dmt"));
//! assert_eq!(-1, score("abc", "xyz"));
//! assert!(score("Tab.kt", "tab") > score("TabManagerDialogVeryLongName.kt", "tab"));
//! ```
//!
//! [`tabs::TabList`] is the list model a dialog drives with it: filtering,
//! ranking and multi-selection of open tabs.

mod error;
pub mod tabs;
pub mod tabsweep;
mod util;

pub use crate::error::{Error, Result};
pub use crate::tabsweep::{CaseMatching, TabSweepMatcher};

#[cfg(not(feature = "compact"))]
pub type IndexType = usize;
#[cfg(feature = "compact")]
pub type IndexType = u32;

pub type ScoreType = i64;

pub trait FuzzyMatcher: Send + Sync {
    /// fuzzy match choice with pattern, and return the score & matched indices of characters
    fn fuzzy_indices(&self, choice: &str, pattern: &str) -> Option<(ScoreType, Vec<IndexType>)>;

    /// fuzzy match choice with pattern, and return the score of matching
    fn fuzzy_match(&self, choice: &str, pattern: &str) -> Option<ScoreType> {
        self.fuzzy_indices(choice, pattern).map(|(score, _)| score)
    }
}
