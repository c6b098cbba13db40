//! Checked transitions for lifecycle enums.

use std::fmt::Debug;

use crate::domain::foundation::ValidationError;

/// A lifecycle enum whose moves are restricted to a fixed edge set.
///
/// Implementors list their outgoing edges; membership tests, checked moves
/// and terminal detection are derived from that list.
pub trait StateMachine: Copy + PartialEq + Debug {
    /// Outgoing edges of `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` when the edge exists.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "dispatch_stage",
                format!("no edge {self:?} -> {target:?}"),
            ));
        }
        Ok(target)
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
