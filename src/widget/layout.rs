//! Grid and pagination arithmetic for article lists.

use super::location::PageLocation;

/// Number of pages needed for `count` articles, `page_size` per page.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    u32::try_from(count.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
}

/// Width each grid item gives up so that `columns` items and the gaps
/// between them fit one row: `ceil(spacing × (columns − 1) / columns)`.
pub fn item_gap(spacing: u32, columns: u32) -> u32 {
    if columns == 0 {
        return 0;
    }
    let total_gap = u64::from(spacing) * u64::from(columns - 1);
    u32::try_from(total_gap.div_ceil(u64::from(columns))).unwrap_or(u32::MAX)
}

/// One numbered link of the paging bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub number: u32,
    pub url: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination {
    pub pages: Vec<PageDescriptor>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl Pagination {
    pub fn build(location: &PageLocation, current: u32, total_pages: u32) -> Self {
        let pages: Vec<_> = (1..=total_pages)
            .map(|number| PageDescriptor {
                number,
                url: location.page_url(number),
                active: number == current,
            })
            .collect();
        let url_of = |number: u32| {
            pages
                .iter()
                .find(|page| page.number == number)
                .map(|page| page.url.clone())
        };
        let previous = current.checked_sub(1).and_then(url_of);
        let next = current.checked_add(1).and_then(url_of);
        Self {
            pages,
            previous,
            next,
        }
    }

    /// The bar is shown only when there is somewhere to go.
    pub fn is_needed(&self) -> bool {
        self.pages.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(1, 6), 1);
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_item_gap() {
        // 3 columns with 12px spacing: 24px of gaps shared by 3 items
        assert_eq!(item_gap(12, 3), 8);
        assert_eq!(item_gap(10, 3), 7);
        assert_eq!(item_gap(20, 1), 0);
        assert_eq!(item_gap(20, 0), 0);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let location = PageLocation::parse("https://example.com/news.html?page=3").unwrap();
        let pagination = Pagination::build(&location, 3, total_pages(25, 10));

        assert_eq!(pagination.pages.len(), 3);
        assert!(pagination.pages[2].active);
        assert!(pagination.next.is_none());
        assert_eq!(
            pagination.previous.as_deref(),
            Some("https://example.com/news.html?page=2")
        );
    }

    #[test]
    fn test_first_page_has_no_previous() {
        let location = PageLocation::parse("https://example.com/news.html").unwrap();
        let pagination = Pagination::build(&location, 1, 2);

        assert!(pagination.previous.is_none());
        assert_eq!(pagination.pages[0].url, "https://example.com/news.html");
        assert_eq!(
            pagination.next.as_deref(),
            Some("https://example.com/news.html?page=2")
        );
    }

    #[test]
    fn test_current_page_out_of_range() {
        let location = PageLocation::parse("https://example.com/news.html?page=9").unwrap();
        let pagination = Pagination::build(&location, 9, 3);

        assert!(pagination.pages.iter().all(|page| !page.active));
        assert!(pagination.previous.is_none());
        assert!(pagination.next.is_none());
    }

    #[test]
    fn test_single_page_not_needed() {
        let location = PageLocation::parse("https://example.com/news.html").unwrap();
        assert!(!Pagination::build(&location, 1, 1).is_needed());
        assert!(Pagination::build(&location, 1, 2).is_needed());
    }
}
