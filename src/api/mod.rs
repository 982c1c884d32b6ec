pub mod json;
pub mod query;

pub use json::{blank_to_none, not_blank, ValidatedJson};
pub use query::LastValueQuery;
