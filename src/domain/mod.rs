pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod delivery;
pub mod errors;
pub mod order;
pub mod ports;
