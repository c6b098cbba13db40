//! Update filter hook.
//!
//! An optional predicate consulted before anything else happens to an
//! update. A denial carries its reason; a failing filter counts as a
//! denial with [`DEFAULT_DENIAL_REASON`].

use crate::domain::foundation::BotIdentity;
use crate::domain::update::Update;

/// Reason logged when a filter fails or denies without saying why.
pub const DEFAULT_DENIAL_REASON: &str = "Update denied by update filter";

/// Error a filter may raise; treated as a denial.
pub type FilterError = Box<dyn std::error::Error + Send + Sync>;

/// Decision of an [`UpdateFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    Allowed,
    Denied(String),
}

impl FilterDecision {
    /// Denial with the default reason.
    pub fn denied() -> Self {
        FilterDecision::Denied(DEFAULT_DENIAL_REASON.to_string())
    }

    /// Denial with a custom reason.
    pub fn denied_because(reason: impl Into<String>) -> Self {
        FilterDecision::Denied(reason.into())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, FilterDecision::Allowed)
    }
}

impl From<bool> for FilterDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            FilterDecision::Allowed
        } else {
            FilterDecision::denied()
        }
    }
}

/// What a filter may inspect besides the update itself.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub bot: &'a BotIdentity,
    pub sender_is_admin: bool,
}

/// User-supplied predicate run before dispatch.
pub trait UpdateFilter: Send + Sync {
    fn check(&self, update: &Update, ctx: &FilterContext<'_>) -> Result<FilterDecision, FilterError>;
}

impl<F> UpdateFilter for F
where
    F: Fn(&Update, &FilterContext<'_>) -> Result<FilterDecision, FilterError> + Send + Sync,
{
    fn check(&self, update: &Update, ctx: &FilterContext<'_>) -> Result<FilterDecision, FilterError> {
        self(update, ctx)
    }
}

/// Runs `filter`, folding errors into a default denial.
pub fn evaluate(filter: &dyn UpdateFilter, update: &Update, ctx: &FilterContext<'_>) -> FilterDecision {
    match filter.check(update, ctx) {
        Ok(FilterDecision::Denied(reason)) if reason.is_empty() => FilterDecision::denied(),
        Ok(decision) => decision,
        Err(_) => FilterDecision::denied(),
    }
}
