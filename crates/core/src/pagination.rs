//! Limit/offset clamping for list endpoints.

/// Default number of rows per page.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Maximum number of rows per page.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(clamp_limit(None, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 100);
        assert_eq!(clamp_limit(Some(0), DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 1);
        assert_eq!(clamp_limit(Some(-5), DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 1);
        assert_eq!(clamp_limit(Some(10_000), DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 500);
        assert_eq!(clamp_limit(Some(42), DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT), 42);
    }

    #[test]
    fn offset_is_never_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(Some(30)), 30);
    }
}
