//! Required-field checks that run before any backend call.

/// Validate a required text field.
pub fn validate_required(value: &str, field_name: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field_name} is required"));
    }
    None
}

/// Both sides of an assignment must be chosen before anything is sent.
pub fn validate_selection(subject_id: &str, target_id: &str, subject: &str, target: &str) -> Option<String> {
    if subject_id.trim().is_empty() || target_id.trim().is_empty() {
        return Some(format!("Please select a {subject} and a {target}."));
    }
    None
}

pub fn validate_passwords_match(password: &str, confirm: &str) -> Option<String> {
    if password != confirm {
        return Some("Passwords do not match".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert_eq!(validate_required("  ", "Name").as_deref(), Some("Name is required"));
        assert_eq!(validate_required("Admin", "Name"), None);
    }

    #[test]
    fn selection_needs_both_ids() {
        assert!(validate_selection("u1", "", "user", "role").is_some());
        assert!(validate_selection("", "r1", "user", "role").is_some());
        assert_eq!(validate_selection("u1", "r1", "user", "role"), None);
        assert_eq!(
            validate_selection("", "", "role", "permission").as_deref(),
            Some("Please select a role and a permission.")
        );
    }

    #[test]
    fn passwords_must_match() {
        assert!(validate_passwords_match("secret1", "secret2").is_some());
        assert_eq!(validate_passwords_match("secret1", "secret1"), None);
    }
}
