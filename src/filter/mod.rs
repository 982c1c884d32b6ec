pub mod filter_where;
pub mod page;
pub mod types;

pub use filter_where::FilterWhere;
pub use page::{Page, PageMeta, PageRequest};
pub use types::*;
