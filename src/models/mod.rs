mod cart_item;
mod order;
mod product;
mod user;

pub use cart_item::{CartItem, CartItemUpdate, NewCartItem};
pub use order::{NewOrder, Order};
pub use product::{NewProduct, Product, ProductUpdate};
pub use user::{NewUser, User};
