pub mod attendance;
pub mod dashboard;
pub mod employee;
pub mod health;
pub mod reports;

/// Shared skip/limit defaults: limit 100 when unset, bounded to keep a
/// single page from dragging the whole table across the wire.
pub(crate) fn page(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(100).clamp(1, 1000);
    (skip, limit)
}
