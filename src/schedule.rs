//! Deterministic next-match selection within a match type.
//!
//! Selection is a pure function over the store's id-ascending match list:
//! the first match not yet complete is next. When every match of the type
//! is complete there is no next match and the arena stays where it is.

use crate::model::Match;

/// Picks the next match to load from an id-ascending list.
///
/// Returns the first match whose status is not "complete", or `None` when
/// the schedule for this type is exhausted.
pub fn next_match(matches: &[Match]) -> Option<&Match> {
    debug_assert!(matches.windows(2).all(|w| w[0].id <= w[1].id));
    matches.iter().find(|m| !m.is_complete())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchType, STATUS_COMPLETE};

    fn practice(id: u32, complete: bool) -> Match {
        Match {
            id,
            match_type: MatchType::Practice,
            display_name: id.to_string(),
            status: if complete {
                STATUS_COMPLETE.to_string()
            } else {
                String::new()
            },
            ..Match::default()
        }
    }

    #[test]
    fn picks_first_incomplete_by_id() {
        let matches = [practice(1, false), practice(2, true), practice(3, false)];
        assert_eq!(next_match(&matches).unwrap().id, 1);

        let matches = [practice(1, true), practice(2, true), practice(3, false)];
        assert_eq!(next_match(&matches).unwrap().id, 3);
    }

    #[test]
    fn exhausted_schedule_yields_none() {
        let matches = [practice(1, true), practice(2, true)];
        assert!(next_match(&matches).is_none());
        assert!(next_match(&[]).is_none());
    }
}
