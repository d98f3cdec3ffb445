//! Attar Domain Concerns

pub mod carts;
pub mod catalog;
pub mod checkouts;
pub mod inventory;
pub mod orders;
pub mod payments;
