pub mod catalog;
pub mod delivery;
pub mod orders;
