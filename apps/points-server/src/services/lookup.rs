//! Point balance lookups.

use entities::UserRecord;

/// Query parameter carrying the identifier scanned from a QR code.
pub const ID_PARAM: &str = "id";

/// Result of resolving a scanned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdLookup {
    /// The identifier belongs to a member.
    Found(UserRecord),
    /// The identifier is an integer but nobody has it.
    NotFound,
    /// The identifier is not an integer.
    Invalid,
}

/// Returns the first value of `key` in a raw URL query string.
///
/// Repeated parameters resolve to their first occurrence; other
/// parameters are ignored.
pub fn first_query_param(query: Option<&str>, key: &str) -> Option<String> {
    let query = query?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Resolves a raw identifier against the ledger.
///
/// Any optionally signed run of digits is an integer. Negative values and
/// values no ledger id can hold resolve to nobody.
pub fn lookup_by_id(users: &[UserRecord], raw: &str) -> IdLookup {
    let raw = raw.trim();
    let digits = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return IdLookup::Invalid;
    }
    if raw.starts_with('-') {
        return IdLookup::NotFound;
    }

    let Ok(id) = digits.parse::<u64>() else {
        return IdLookup::NotFound;
    };

    users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map_or(IdLookup::NotFound, IdLookup::Found)
}

/// Finds the first member whose email matches exactly.
pub fn lookup_by_email<'a>(users: &'a [UserRecord], email: &str) -> Option<&'a UserRecord> {
    users.iter().find(|u| u.email == email)
}
