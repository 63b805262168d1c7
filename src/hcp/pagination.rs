//! Sequential page walking over server-paginated collections
//!
//! Every lookup-by-name goes through [`find_in_pages`]: request page 1 with
//! no page parameter, scan items in server order, follow the server's
//! `next-page` cursor, and stop once `current-page >= total-pages`.
//! Errors from the page fetch abort the walk as-is; nothing is retried.

use log::debug;
use std::future::Future;

use crate::error::{Result, TfeError};
use crate::hcp::Pagination;

/// One page of a listing: items plus the server-reported cursor
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// A page with no pagination metadata (the whole collection)
    pub fn single(items: Vec<T>) -> Self {
        Self {
            items,
            pagination: None,
        }
    }

    /// Page number to request next, or `None` when the walk is over
    pub fn next_cursor(&self) -> Option<u32> {
        let p = self.pagination.as_ref()?;
        if p.current_page >= p.total_pages {
            return None;
        }
        Some(
            p.next_page
                .filter(|next| *next > p.current_page)
                .unwrap_or(p.current_page + 1),
        )
    }
}

/// Walk pages until `predicate` matches, returning the first matching item
///
/// `fetch` receives `None` for the first request and the server-supplied
/// next page number afterwards. Exhausting the pages yields
/// [`TfeError::NotFound`] naming `resource` and `key`.
pub async fn find_in_pages<T, F, Fut, P>(
    mut fetch: F,
    mut predicate: P,
    resource: &str,
    key: &str,
) -> Result<T>
where
    F: FnMut(Option<u32>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    P: FnMut(&T) -> bool,
{
    let mut page_number: Option<u32> = None;

    loop {
        let page = fetch(page_number).await?;
        let next = page.next_cursor();

        if let Some(item) = page.items.into_iter().find(|item| predicate(item)) {
            return Ok(item);
        }

        match next {
            Some(n) => {
                debug!(
                    "No {} '{}' on page {:?}, moving to page {}",
                    resource, key, page_number, n
                );
                page_number = Some(n);
            }
            None => return Err(TfeError::not_found(resource, key)),
        }
    }
}

/// Walk every page and collect all items in server order
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<u32>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut page_number: Option<u32> = None;
    let mut all_items = Vec::new();

    loop {
        let page = fetch(page_number).await?;
        let next = page.next_cursor();
        all_items.extend(page.items);

        match next {
            Some(n) => page_number = Some(n),
            None => return Ok(all_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn pagination(current: u32, total: u32, next: Option<u32>) -> Option<Pagination> {
        Some(Pagination {
            current_page: current,
            total_pages: total,
            next_page: next,
            prev_page: None,
            total_count: total,
        })
    }

    /// Fake lister: `total` pages with one item each, item value == page number
    fn fake_page(requested: Option<u32>, total: u32) -> Result<Page<u32>> {
        let current = requested.unwrap_or(1);
        let next = if current < total { Some(current + 1) } else { None };
        Ok(Page {
            items: vec![current],
            pagination: pagination(current, total, next),
        })
    }

    #[tokio::test]
    async fn test_match_on_last_page_takes_three_requests() {
        let requests = RefCell::new(Vec::new());

        let found = find_in_pages(
            |page| {
                requests.borrow_mut().push(page);
                async move { fake_page(page, 3) }
            },
            |item: &u32| *item == 3,
            "item",
            "3",
        )
        .await
        .unwrap();

        assert_eq!(found, 3);
        assert_eq!(*requests.borrow(), vec![None, Some(2), Some(3)]);
    }

    #[tokio::test]
    async fn test_no_match_requests_every_page_then_not_found() {
        let count = RefCell::new(0u32);

        let err = find_in_pages(
            |page| {
                *count.borrow_mut() += 1;
                async move { fake_page(page, 4) }
            },
            |_| false,
            "agent pool",
            "missing-pool",
        )
        .await
        .unwrap_err();

        assert_eq!(*count.borrow(), 4);
        match err {
            TfeError::NotFound { resource, key } => {
                assert_eq!(resource, "agent pool");
                assert_eq!(key, "missing-pool");
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_match_on_first_page_stops_early() {
        let count = RefCell::new(0u32);

        let found = find_in_pages(
            |page| {
                *count.borrow_mut() += 1;
                async move { fake_page(page, 5) }
            },
            |item: &u32| *item == 1,
            "item",
            "1",
        )
        .await
        .unwrap();

        assert_eq!(found, 1);
        assert_eq!(*count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_first_match_in_server_order_wins() {
        let found = find_in_pages(
            |_| async { Ok(Page::single(vec![("a", 1), ("b", 2), ("b", 3)])) },
            |item: &(&str, i32)| item.0 == "b",
            "item",
            "b",
        )
        .await
        .unwrap();

        assert_eq!(found, ("b", 2));
    }

    #[tokio::test]
    async fn test_fetch_error_aborts_walk() {
        let count = RefCell::new(0u32);

        let err = find_in_pages(
            |page| {
                *count.borrow_mut() += 1;
                async move {
                    match page {
                        None => fake_page(None, 3),
                        Some(_) => Err(TfeError::Api {
                            status: 500,
                            message: "Failed to fetch items (page 2)".to_string(),
                        }),
                    }
                }
            },
            |_| false,
            "item",
            "x",
        )
        .await
        .unwrap_err();

        assert_eq!(*count.borrow(), 2);
        assert!(matches!(err, TfeError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_page_without_meta_is_single_page() {
        let count = RefCell::new(0u32);

        let err = find_in_pages(
            |_| {
                *count.borrow_mut() += 1;
                async { Ok(Page::single(vec![1, 2, 3])) }
            },
            |item: &i32| *item == 9,
            "item",
            "9",
        )
        .await
        .unwrap_err();

        assert_eq!(*count.borrow(), 1);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_next_cursor_falls_back_when_next_page_missing() {
        let page: Page<u32> = Page {
            items: vec![],
            pagination: pagination(2, 4, None),
        };
        assert_eq!(page.next_cursor(), Some(3));

        let page: Page<u32> = Page {
            items: vec![],
            pagination: pagination(2, 4, Some(2)),
        };
        assert_eq!(page.next_cursor(), Some(3));
    }

    #[test]
    fn test_next_cursor_stops_at_last_page() {
        let page: Page<u32> = Page {
            items: vec![],
            pagination: pagination(3, 3, Some(4)),
        };
        assert_eq!(page.next_cursor(), None);

        let empty: Page<u32> = Page {
            items: vec![],
            pagination: pagination(1, 0, None),
        };
        assert_eq!(empty.next_cursor(), None);
    }

    #[tokio::test]
    async fn test_collect_pages_keeps_order() {
        let items = collect_pages(|page| async move { fake_page(page, 3) })
            .await
            .unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }
}
