//! Record sources and pagination.

use async_trait::async_trait;
use tracing::info;

use crate::calendar::CalendarRange;
use crate::models::{Record, RecordPage};
use crate::{Error, Result};

/// A paginated supplier of date-bearing records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one page starting at `cursor`.
    ///
    /// `window` is a hint; sources may ignore it and return records outside it.
    async fn query_page(
        &self,
        window: Option<&CalendarRange>,
        cursor: Option<&str>,
    ) -> Result<RecordPage>;
}

/// Fetch every page from `source`, in order, following continuation cursors.
///
/// Fails if the source still reports more pages after `max_pages` requests,
/// or reports more pages without a cursor to continue from.
pub async fn fetch_all_records<S>(
    source: &S,
    window: Option<&CalendarRange>,
    max_pages: u32,
) -> Result<Vec<Record>>
where
    S: RecordSource + ?Sized,
{
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        if pages == max_pages {
            return Err(Error::Source(format!(
                "record source still has more results after {} pages",
                max_pages
            )));
        }

        let page = source.query_page(window, cursor.as_deref()).await?;
        pages += 1;
        records.extend(page.records);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                return Err(Error::Source(
                    "record source reported more pages without a cursor".to_string(),
                ));
            }
        }
    }

    info!("Fetched {} records in {} pages", records.len(), pages);
    Ok(records)
}
