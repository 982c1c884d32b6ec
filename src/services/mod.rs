pub mod ownership;
pub mod search;

pub use ownership::{parse_id, resolve_address, resolve_contact, ResolveError};
pub use search::search_contacts;
