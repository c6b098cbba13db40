//! Dispatch vocabulary - cycle stages and the update filter hook.

pub mod filter;
mod stage;
mod state_machine;

pub use filter::{FilterContext, FilterDecision, FilterError, UpdateFilter, DEFAULT_DENIAL_REASON};
pub use stage::DispatchStage;
pub use state_machine::StateMachine;
