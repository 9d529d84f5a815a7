//! Page objects for the application under test.
//!
//! Pages compose a small [`PageActions`] capability object exposing
//! click/fill primitives rather than inheriting from a base page.

mod actions;
mod inventory;
mod login;

pub use actions::PageActions;
pub use inventory::InventoryPage;
pub use login::LoginPage;
