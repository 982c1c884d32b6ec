pub mod health;
pub mod users;

pub use health::health;
pub use users::{login, register};
