//! Observation narration policy.
//!
//! Two independent policies can each propose an observation for a tick:
//! how long the current state has lasted, and how often it changed in the
//! last minute. Which one wins when both fire is a configuration choice,
//! not a hardcoded ordering.

use gnome_core::{ObservationPrecedence, PatternSummary};

/// Candidate from the state-duration policy.
fn duration_candidate(patterns: &PatternSummary, current_state: &str) -> Option<String> {
    let duration = patterns.current_state_duration_secs;
    if duration > 300.0 {
        Some(format!(
            "It's been {current_state} for quite a while now... ({} minutes)",
            (duration / 60.0) as u64
        ))
    } else if duration > 60.0 {
        Some(format!("It's been {current_state} for a minute now..."))
    } else {
        None
    }
}

/// Candidate from the transition-frequency policy.
fn transition_candidate(patterns: &PatternSummary) -> Option<String> {
    let transitions = patterns.transitions_last_minute;
    if transitions > 5 {
        Some(format!(
            "The light is changing so quickly! {transitions} times in the last minute!"
        ))
    } else if transitions > 0 {
        Some(format!(
            "The light changed {transitions} times in the last minute."
        ))
    } else {
        None
    }
}

/// Compose the observation for this tick, if either policy fires.
pub fn compose_observation(
    patterns: &PatternSummary,
    current_state: &str,
    precedence: ObservationPrecedence,
) -> Option<String> {
    match precedence {
        ObservationPrecedence::TransitionsFirst => {
            transition_candidate(patterns).or_else(|| duration_candidate(patterns, current_state))
        }
        ObservationPrecedence::DurationFirst => {
            duration_candidate(patterns, current_state).or_else(|| transition_candidate(patterns))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(transitions: usize, duration: f64) -> PatternSummary {
        PatternSummary {
            transitions_last_minute: transitions,
            transitions_last_5_minutes: transitions,
            current_state_duration_secs: duration,
        }
    }

    #[test]
    fn test_quiet_patterns_produce_nothing() {
        assert_eq!(
            compose_observation(&patterns(0, 30.0), "light", ObservationPrecedence::TransitionsFirst),
            None
        );
    }

    #[test]
    fn test_duration_over_a_minute() {
        let obs = compose_observation(
            &patterns(0, 90.0),
            "dark",
            ObservationPrecedence::TransitionsFirst,
        )
        .unwrap();
        assert_eq!(obs, "It's been dark for a minute now...");
    }

    #[test]
    fn test_duration_over_five_minutes_reports_minutes() {
        let obs = compose_observation(
            &patterns(0, 420.0),
            "light",
            ObservationPrecedence::TransitionsFirst,
        )
        .unwrap();
        assert!(obs.contains("quite a while"));
        assert!(obs.contains("(7 minutes)"));
    }

    #[test]
    fn test_few_transitions() {
        let obs = compose_observation(
            &patterns(2, 10.0),
            "light",
            ObservationPrecedence::TransitionsFirst,
        )
        .unwrap();
        assert_eq!(obs, "The light changed 2 times in the last minute.");
    }

    #[test]
    fn test_many_transitions() {
        let obs = compose_observation(
            &patterns(7, 10.0),
            "light",
            ObservationPrecedence::TransitionsFirst,
        )
        .unwrap();
        assert!(obs.contains("changing so quickly"));
    }

    #[test]
    fn test_precedence_transitions_first() {
        // Both policies fire; transitions win.
        let obs = compose_observation(
            &patterns(3, 400.0),
            "dark",
            ObservationPrecedence::TransitionsFirst,
        )
        .unwrap();
        assert!(obs.contains("changed 3 times"));
    }

    #[test]
    fn test_precedence_duration_first() {
        // Same patterns; duration wins under the other ordering.
        let obs = compose_observation(
            &patterns(3, 400.0),
            "dark",
            ObservationPrecedence::DurationFirst,
        )
        .unwrap();
        assert!(obs.contains("quite a while"));
    }

    #[test]
    fn test_precedence_falls_through_when_one_side_is_silent() {
        let obs = compose_observation(
            &patterns(0, 400.0),
            "dark",
            ObservationPrecedence::TransitionsFirst,
        )
        .unwrap();
        assert!(obs.contains("quite a while"));

        let obs = compose_observation(
            &patterns(2, 5.0),
            "dark",
            ObservationPrecedence::DurationFirst,
        )
        .unwrap();
        assert!(obs.contains("changed 2 times"));
    }
}
