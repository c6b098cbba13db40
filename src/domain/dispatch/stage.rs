//! Stages of one dispatch cycle.

use serde::Serialize;

use super::StateMachine;

/// Where a dispatch cycle is, or where it ended.
///
/// ```text
/// Received -> Filtered -> Classified -> DeduplicationChecked -> Resolved -> Executing -> Completed
///     |                        |                  |
///  Rejected                Duplicate           Fallback -> Executing
/// ```
/// Any non-terminal stage may also end in `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStage {
    Received,
    Filtered,
    Classified,
    DeduplicationChecked,
    Resolved,
    Fallback,
    Executing,
    Completed,
    Rejected,
    Duplicate,
    Error,
}

impl StateMachine for DispatchStage {
    fn valid_transitions(&self) -> Vec<Self> {
        use DispatchStage::*;
        match self {
            Received => vec![Filtered, Rejected, Error],
            Filtered => vec![Classified, Error],
            Classified => vec![DeduplicationChecked, Duplicate, Error],
            DeduplicationChecked => vec![Resolved, Fallback, Error],
            Resolved => vec![Executing, Error],
            Fallback => vec![Executing, Error],
            Executing => vec![Completed, Error],
            Completed | Rejected | Duplicate | Error => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_valid() {
        let mut stage = DispatchStage::Received;
        for next in [
            DispatchStage::Filtered,
            DispatchStage::Classified,
            DispatchStage::DeduplicationChecked,
            DispatchStage::Resolved,
            DispatchStage::Executing,
            DispatchStage::Completed,
        ] {
            stage = stage.transition_to(next).unwrap();
        }
        assert!(stage.is_terminal());
    }

    #[test]
    fn fallback_path_is_valid() {
        let stage = DispatchStage::DeduplicationChecked
            .transition_to(DispatchStage::Fallback)
            .and_then(|s| s.transition_to(DispatchStage::Executing))
            .unwrap();
        assert_eq!(stage, DispatchStage::Executing);
    }

    #[test]
    fn cannot_skip_filtering() {
        assert!(DispatchStage::Received
            .transition_to(DispatchStage::Classified)
            .is_err());
    }

    #[test]
    fn terminal_stages_accept_nothing() {
        for stage in [
            DispatchStage::Completed,
            DispatchStage::Rejected,
            DispatchStage::Duplicate,
            DispatchStage::Error,
        ] {
            assert!(stage.is_terminal());
            assert!(!stage.can_transition_to(&DispatchStage::Error));
        }
    }

    #[test]
    fn any_open_stage_can_fail() {
        assert!(DispatchStage::Executing.can_transition_to(&DispatchStage::Error));
        assert!(DispatchStage::Received.can_transition_to(&DispatchStage::Error));
    }
}
