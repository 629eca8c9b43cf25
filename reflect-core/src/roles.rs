// Role label normalization

use crate::types::Role;

/// Map a raw role label onto the canonical set.
///
/// Matching is case-insensitive and ignores surrounding whitespace. Labels
/// outside the alias table pass through lower-cased and trimmed.
pub fn normalize_role(raw: &str) -> Role {
    let label = raw.trim().to_lowercase();
    match label.as_str() {
        "user" | "human" | "customer" => Role::User,
        "assistant" | "ai" | "bot" | "agent" => Role::Assistant,
        "system" => Role::System,
        "tool" | "function" => Role::Tool,
        _ => Role::Other(label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_role("human"), Role::User);
        assert_eq!(normalize_role("customer"), Role::User);
        assert_eq!(normalize_role("ai"), Role::Assistant);
        assert_eq!(normalize_role("bot"), Role::Assistant);
        assert_eq!(normalize_role("agent"), Role::Assistant);
        assert_eq!(normalize_role("function"), Role::Tool);
        assert_eq!(normalize_role("system"), Role::System);
    }

    #[test]
    fn test_case_insensitive() {
        for raw in ["USER", "User", "user", "  uSeR \n"] {
            assert_eq!(normalize_role(raw), Role::User);
        }
    }

    #[test]
    fn test_canonical_roles_are_fixed_points() {
        for role in [Role::User, Role::Assistant, Role::System, Role::Tool] {
            assert_eq!(normalize_role(role.as_str()), role);
        }
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        assert_eq!(normalize_role(" Observer "), Role::Other("observer".to_string()));
        assert_eq!(normalize_role("unknown"), Role::Other("unknown".to_string()));
        assert!(!normalize_role("critic").is_canonical());
    }
}
