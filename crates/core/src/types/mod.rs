//! Shared type definitions.
//!
//! Everything the storefront client and the CLI agree on lives here: ID
//! newtypes, money, catalog entities, cart and wishlist lines, addresses,
//! and the order/payment types exchanged with the commerce API.

mod address;
mod cart;
mod category;
mod id;
mod order;
mod price;
mod product;

pub use address::{Address, AddressForm, AddressValidationError, apply_default};
pub use cart::{CartItem, WishlistItem};
pub use category::Category;
pub use id::{AddressId, CartLineId, CategoryId, OrderId, ProductId, UserId};
pub use order::{
    Order, OrderIntent, OrderLine, PaymentMethod, PaymentSession, PaymentStatus, ShippingAddress,
    ShippingMethod,
};
pub use price::Price;
pub use product::Product;
