//! AdminAuthority - the set of privileged sender identities.

use std::collections::BTreeSet;

use tracing::error;

use crate::domain::foundation::UserId;
use crate::domain::update::Update;

/// Append-only set of admin user ids.
#[derive(Debug, Clone, Default)]
pub struct AdminAuthority {
    ids: BTreeSet<UserId>,
}

impl AdminAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one admin. Non-positive ids are logged and dropped; duplicates
    /// are ignored. Returns whether the id was newly added.
    pub fn enable(&mut self, id: i64) -> bool {
        match UserId::new(id) {
            Ok(user_id) => self.ids.insert(user_id),
            Err(_) => {
                error!(admin_id = id, "Invalid value '{}' for admin", id);
                false
            }
        }
    }

    /// Adds several admins, see [`AdminAuthority::enable`].
    pub fn enable_many(&mut self, ids: impl IntoIterator<Item = i64>) {
        for id in ids {
            self.enable(id);
        }
    }

    /// All admin ids, ascending.
    pub fn list(&self) -> &BTreeSet<UserId> {
        &self.ids
    }

    /// Whether `id` is an admin.
    ///
    /// Without an explicit id the sender of `current` is used; with neither
    /// the answer is `false`.
    pub fn is_admin(&self, id: Option<UserId>, current: Option<&Update>) -> bool {
        id.or_else(|| current.and_then(Update::sender_id))
            .is_some_and(|id| self.ids.contains(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn callback_from(sender: i64) -> Update {
        Update::from_value(json!({
            "update_id": 3,
            "callback_query": {"id": "cb", "from": {"id": sender, "first_name": "Cy"}, "data": "x"}
        }))
        .unwrap()
    }

    #[test]
    fn enable_rejects_non_positive_ids() {
        let mut admins = AdminAuthority::new();
        assert!(!admins.enable(0));
        assert!(!admins.enable(-7));
        assert!(admins.list().is_empty());
    }

    #[test]
    fn enable_ignores_duplicates() {
        let mut admins = AdminAuthority::new();
        assert!(admins.enable(42));
        assert!(!admins.enable(42));
        assert_eq!(admins.list().len(), 1);
    }

    #[test]
    fn enable_many_keeps_only_valid_ids() {
        let mut admins = AdminAuthority::new();
        admins.enable_many([3, -1, 1, 3]);
        let ids: Vec<i64> = admins.list().iter().map(|id| id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn explicit_id_wins_over_update_sender() {
        let mut admins = AdminAuthority::new();
        admins.enable(42);
        let update = callback_from(7);
        assert!(admins.is_admin(Some(UserId::new(42).unwrap()), Some(&update)));
        assert!(!admins.is_admin(None, Some(&update)));
    }

    #[test]
    fn sender_is_derived_from_callback_query() {
        let mut admins = AdminAuthority::new();
        admins.enable(42);
        assert!(admins.is_admin(None, Some(&callback_from(42))));
    }

    #[test]
    fn no_id_and_no_update_is_not_admin() {
        let mut admins = AdminAuthority::new();
        admins.enable(42);
        assert!(!admins.is_admin(None, None));
    }

    proptest! {
        #[test]
        fn probe_matches_membership(admin in 1i64..1000, sender in 1i64..1000) {
            let mut admins = AdminAuthority::new();
            admins.enable(admin);
            prop_assert_eq!(admins.is_admin(None, Some(&callback_from(sender))), admin == sender);
        }
    }
}
