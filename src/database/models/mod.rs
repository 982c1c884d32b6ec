pub mod address;
pub mod contact;
pub mod user;

pub use address::{Address, AddressData};
pub use contact::{Contact, ContactData};
pub use user::{NewUser, User};
