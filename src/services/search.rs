use crate::database::models::Contact;
use crate::database::{DatabaseError, Store};
use crate::filter::{ContactFilter, Page, PageRequest};

/// One page of `user_id`'s contacts matching `filter`.
///
/// `total` counts every match regardless of the page; a page past the end
/// comes back empty rather than as an error.
pub async fn search_contacts(
    store: &dyn Store,
    user_id: i64,
    filter: &ContactFilter,
    request: PageRequest,
) -> Result<Page<Contact>, DatabaseError> {
    let predicates = filter.predicates(user_id);
    let total = store.count_contacts(&predicates).await?;

    // An offset too large to represent is past the end of any result set
    let rows = match request.offset() {
        Some(offset) if u64::try_from(offset).map_or(false, |skip| skip < total) => {
            store.select_contacts(&predicates, request.limit(), offset).await?
        }
        _ => Vec::new(),
    };

    Ok(Page::new(rows, total, request))
}
