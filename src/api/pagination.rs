//! Offset-based pagination over list endpoints.

use std::future::Future;

use anyhow::Result;

/// Request pages at increasing offsets until a short or empty page, or
/// until `max_items` have been collected.
pub async fn collect_pages<T, F, Fut>(
    page_size: u32,
    max_items: usize,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let page_size = page_size.max(1);
    let mut items = Vec::new();
    let mut offset = 0u32;

    while items.len() < max_items {
        let page = fetch_page(offset).await?;
        let received = page.len();
        items.extend(page);

        if received < page_size as usize {
            break;
        }
        offset += page_size;
    }

    items.truncate(max_items);
    Ok(items)
}
