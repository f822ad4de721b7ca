//! Limit/offset pagination window for listing short URLs.

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Effective pagination window after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Builds a window from raw caller input.
    ///
    /// - missing or non-positive `limit` falls back to [`DEFAULT_LIMIT`]
    /// - `limit` above [`MAX_LIMIT`] is clamped to it
    /// - missing or negative `offset` becomes 0
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if l > 0 => l.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        let offset = offset.unwrap_or(0).max(0);

        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(
            Page::default(),
            Page {
                limit: 20,
                offset: 0
            }
        );
    }

    #[test]
    fn test_zero_and_negative_limit_fall_back() {
        assert_eq!(Page::new(Some(0), None).limit, 20);
        assert_eq!(Page::new(Some(-5), None).limit, 20);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        assert_eq!(Page::new(Some(101), None).limit, 100);
        assert_eq!(Page::new(Some(10_000), None).limit, 100);
        assert_eq!(Page::new(Some(100), None).limit, 100);
    }

    #[test]
    fn test_limit_in_range_kept() {
        assert_eq!(Page::new(Some(1), None).limit, 1);
        assert_eq!(Page::new(Some(55), None).limit, 55);
    }

    #[test]
    fn test_negative_offset_clamped() {
        assert_eq!(Page::new(None, Some(-1)).offset, 0);
        assert_eq!(Page::new(None, Some(40)).offset, 40);
    }
}
