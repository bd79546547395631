//! Identifier extraction from repository handles.

use crate::error::DepositError;

/// The last non-empty `/`-separated segment of `handle`.
///
/// ```
/// use fedora_deposit_connector::handle::id_from_handle;
///
/// let id = id_from_handle("http://fedora:8080/rest/plans/a1b2c3/").unwrap();
/// assert_eq!(id, "a1b2c3");
/// ```
pub fn id_from_handle(handle: &str) -> Result<&str, DepositError> {
    handle
        .trim()
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .ok_or_else(|| DepositError::InvalidHandle(handle.to_string()))
}
