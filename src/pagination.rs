//! This module defines the common functionality for paging data.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions returned per page.
    pub page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            page_size: 10,
        }
    }
}

/// The number of pages needed to show `total_count` items.
pub fn page_count(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size)
}

/// The number of rows to skip for a 1-indexed `page`.
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1) * page_size
}

#[cfg(test)]
mod tests {
    use super::{page_count, page_offset};

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
    }

    #[test]
    fn offset_is_zero_for_first_page() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn offset_treats_page_zero_as_first_page() {
        assert_eq!(page_offset(0, 10), 0);
    }
}
