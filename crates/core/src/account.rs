//! Account identity rules.

/// Trim and lowercase an email address, rejecting obviously malformed input.
///
/// Only checks shape (`local@domain` with a dot in the domain); deliverability
/// is not verified.
pub fn normalize_email(raw: &str) -> Result<String, String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid || email.chars().any(char::is_whitespace) {
        return Err("Please provide a valid email address".to_string());
    }
    Ok(email)
}
