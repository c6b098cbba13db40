//! Per-dispatcher session state and per-cycle stage tracking.

use tracing::{trace, warn};

use crate::domain::command::ExecutionResult;
use crate::domain::dispatch::{DispatchStage, StateMachine};
use crate::domain::foundation::UpdateId;

/// State kept across dispatch cycles for inspection after dispatch returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Id of the last update seen, whether or not its dispatch succeeded.
    pub last_update_id: Option<UpdateId>,

    /// Result of the last completed cycle.
    pub last_result: Option<ExecutionResult>,

    /// Stage the last cycle ended in.
    pub last_stage: Option<DispatchStage>,
}

/// Stage tracker for one dispatch cycle.
#[derive(Debug)]
pub(super) struct Cycle {
    update_id: UpdateId,
    stage: DispatchStage,
}

impl Cycle {
    pub(super) fn new(update_id: UpdateId) -> Self {
        trace!(update_id = update_id.value(), stage = ?DispatchStage::Received, "dispatch stage");
        Self {
            update_id,
            stage: DispatchStage::Received,
        }
    }

    /// A cycle for a directly executed command; filtering, classification
    /// and deduplication do not apply.
    pub(super) fn direct(update_id: UpdateId) -> Self {
        let mut cycle = Self::new(update_id);
        cycle.enter(DispatchStage::Filtered);
        cycle.enter(DispatchStage::Classified);
        cycle.enter(DispatchStage::DeduplicationChecked);
        cycle
    }

    pub(super) fn stage(&self) -> DispatchStage {
        self.stage
    }

    pub(super) fn enter(&mut self, next: DispatchStage) {
        match self.stage.transition_to(next) {
            Ok(stage) => {
                trace!(update_id = self.update_id.value(), stage = ?stage, "dispatch stage");
                self.stage = stage;
            }
            Err(err) => {
                warn!(update_id = self.update_id.value(), error = %err, "unexpected dispatch stage");
                self.stage = next;
            }
        }
    }
}
