//! String-literal escaping for the event-store query dialect.
//!
//! The store's HTTP interface takes query text only — it has no typed
//! parameter binding — so every value interpolated into a query passes
//! through [`escape_literal`]. This is the tenant-isolation boundary: a site
//! key that could break out of its quoted literal would widen the query to
//! other tenants' events.

/// Escape a value for embedding inside a single-quoted SQL string literal.
///
/// Backslashes are doubled first, then single quotes, so neither can
/// terminate the literal early.
pub fn escape_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('\'', "''")
}
