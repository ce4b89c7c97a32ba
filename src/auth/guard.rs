//! Ownership guard: decides whether an authenticated caller may act on a path-addressed owner.

use uuid::Uuid;

use super::token::Claims;

/// Parses an owner id, accepting only the canonical hyphenated lower-case form.
///
/// `Uuid::parse_str` also accepts upper-case, braced, simple and URN forms; those are
/// rejected here so the same id cannot be addressed through several spellings.
pub fn parse_owner_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw)
        .ok()
        .filter(|id| id.hyphenated().to_string() == raw)
}

/// Returns true iff `claims.sub` and `path_owner_id` are the same canonical account id.
///
/// Authentication must already have produced `claims`; this only adjudicates authorization.
pub fn verify_ownership(path_owner_id: &str, claims: &Claims) -> bool {
    match (parse_owner_id(path_owner_id), claims.subject_id()) {
        (Some(owner), Some(subject)) => owner == subject,
        _ => false,
    }
}
