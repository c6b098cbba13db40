//! Command naming conventions.
//!
//! Command names are case-insensitive and stored lower-cased. Update and
//! message type tags map onto command names by capitalizing each
//! underscore-separated segment and joining them (`edited_message` becomes
//! `EditedMessage`, looked up as `editedmessage`).

use super::CommandTier;

/// Fallback command for unresolved or disabled commands.
pub const GENERIC_COMMAND: &str = "generic";

/// Command name assigned to messages that route to no specific command.
pub const GENERIC_MESSAGE_COMMAND: &str = "genericmessage";

/// Suffix every command artifact name carries.
pub const COMMAND_SUFFIX: &str = "Command";

/// Namespace conventional references live under unless a location overrides it.
pub const DEFAULT_NAMESPACE: &str = "telegram_dispatch::commands";

/// Lower-cased lookup key for a command name.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

/// Capitalizes each `_`-separated segment and joins them: `video_note` -> `VideoNote`.
pub fn uc_first_underscore(tag: &str) -> String {
    tag.split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Command name derived from an update or message type tag.
pub fn command_name_from_type(tag: &str) -> String {
    uc_first_underscore(tag)
}

/// Conventional reference of a command: `<namespace>::<tier>_commands::<Name>Command`.
pub fn conventional_reference(namespace: &str, tier: CommandTier, name: &str) -> String {
    format!(
        "{}::{}::{}{}",
        namespace,
        tier.module(),
        uc_first_underscore(&normalize(name)),
        COMMAND_SUFFIX
    )
}

/// Command name an artifact reference stands for, if it follows the `*Command` convention.
///
/// `app::user_commands::WeatherCommand` yields `weather`.
pub fn command_name_from_reference(reference: &str) -> Option<String> {
    let artifact = reference.rsplit("::").next().unwrap_or(reference);
    let stem = artifact.strip_suffix(COMMAND_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(normalize(&uc_first_underscore(stem)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn type_tags_become_camel_case_names() {
        assert_eq!(command_name_from_type("photo"), "Photo");
        assert_eq!(command_name_from_type("edited_message"), "EditedMessage");
        assert_eq!(command_name_from_type("new_chat_members"), "NewChatMembers");
    }

    #[test]
    fn normalize_lowercases() {
        assert_eq!(normalize("EditedMessage"), "editedmessage");
    }

    #[test]
    fn conventional_reference_uses_tier_module() {
        assert_eq!(
            conventional_reference(DEFAULT_NAMESPACE, CommandTier::Admin, "Ban"),
            "telegram_dispatch::commands::admin_commands::BanCommand"
        );
        assert_eq!(
            conventional_reference("app", CommandTier::System, "genericmessage"),
            "app::system_commands::GenericmessageCommand"
        );
    }

    #[test]
    fn reference_names_strip_suffix_and_lowercase() {
        assert_eq!(
            command_name_from_reference("app::user_commands::WeatherCommand"),
            Some("weather".to_string())
        );
        assert_eq!(command_name_from_reference("StartCommand"), Some("start".to_string()));
    }

    #[test]
    fn references_without_suffix_are_not_commands() {
        assert_eq!(command_name_from_reference("app::user_commands::Helper"), None);
        assert_eq!(command_name_from_reference("app::Command"), None);
    }

    proptest! {
        #[test]
        fn derived_names_never_contain_underscores(tag in "[a-z]{1,8}(_[a-z]{1,8}){0,3}") {
            let name = command_name_from_type(&tag);
            prop_assert!(!name.contains('_'));
            prop_assert_eq!(normalize(&name), tag.replace('_', ""));
        }

        #[test]
        fn reference_round_trips_name(name in "[a-z]{1,12}") {
            let reference = conventional_reference(DEFAULT_NAMESPACE, CommandTier::User, &name);
            prop_assert_eq!(command_name_from_reference(&reference), Some(name));
        }
    }
}
