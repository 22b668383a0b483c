pub mod account;
pub mod browse;
pub mod cart;
pub mod checkout;
pub mod pay;
pub mod wishlist;
