//! In-memory entity store.
//!
//! Four keyed collections (users, products, cart items, orders), each with
//! its own sequential id counter starting at 1. Ids are never reused after a
//! delete. Every operation takes the lock for its full duration and contains
//! no await point inside a mutation, so operations are atomic with respect
//! to each other.
//!
//! The store owns all records; callers always receive clones. Lifecycle is
//! construct → [`Store::seed`] → serve; the router is only built once
//! seeding has completed.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tokio::task;
use tracing::info;

use crate::config::SeedConfig;
use crate::models::{
    CartItem, NewCartItem, NewOrder, NewProduct, Order, Product, ProductUpdate, User,
};
use crate::services::credentials;

struct Counters {
    users: i32,
    products: i32,
    cart_items: i32,
    orders: i32,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            users: 1,
            products: 1,
            cart_items: 1,
            orders: 1,
        }
    }
}

/// Sequential ids mean id order is insertion order, which `BTreeMap`
/// iteration preserves for the `list` operations.
#[derive(Default)]
struct Collections {
    users: BTreeMap<i32, User>,
    products: BTreeMap<i32, Product>,
    cart_items: BTreeMap<i32, CartItem>,
    orders: BTreeMap<i32, Order>,
    counters: Counters,
}

#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<Collections>>,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the administrator account and the sample catalog. Idempotent:
    /// a store that already has users is left untouched.
    ///
    /// Hashing the admin password is the one expensive step, so it runs on
    /// the blocking pool before the lock is taken.
    pub async fn seed(&self, seed: &SeedConfig) -> Result<()> {
        if !self.inner.read().await.users.is_empty() {
            return Ok(());
        }

        let password = seed.admin_password.clone();
        let password_hash = task::spawn_blocking(move || credentials::hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let admin = self
            .create_user(seed.admin_username.clone(), password_hash, true)
            .await;

        let mut count = 0;
        for product in sample_catalog() {
            self.create_product(product).await;
            count += 1;
        }

        info!(
            "Store seeded: admin user '{}' and {} sample products",
            admin.username, count
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn get_user(&self, id: i32) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    pub async fn get_user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    /// Username uniqueness is the register handler's job, not the store's.
    pub async fn create_user(&self, username: String, password: String, is_admin: bool) -> User {
        let mut inner = self.inner.write().await;
        let id = inner.counters.users;
        inner.counters.users += 1;

        let user = User {
            id,
            username,
            password,
            is_admin,
        };
        inner.users.insert(id, user.clone());
        user
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub async fn list_products(&self) -> Vec<Product> {
        self.inner.read().await.products.values().cloned().collect()
    }

    pub async fn get_product(&self, id: i32) -> Option<Product> {
        self.inner.read().await.products.get(&id).cloned()
    }

    pub async fn create_product(&self, new: NewProduct) -> Product {
        let mut inner = self.inner.write().await;
        let id = inner.counters.products;
        inner.counters.products += 1;

        let product = Product {
            id,
            name: new.name,
            description: new.description,
            price: new.price,
            image: new.image,
            category: new.category,
            stock: new.stock,
        };
        inner.products.insert(id, product.clone());
        product
    }

    /// Merge the provided fields into the stored record. `None` when the id
    /// is absent.
    pub async fn update_product(&self, id: i32, update: ProductUpdate) -> Option<Product> {
        let mut inner = self.inner.write().await;
        let product = inner.products.get_mut(&id)?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(image) = update.image {
            product.image = image;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }

        Some(product.clone())
    }

    /// `false` when the id is absent; the handler maps that to a 404.
    /// No cascade: cart items referencing the product are left in place.
    pub async fn delete_product(&self, id: i32) -> bool {
        self.inner.write().await.products.remove(&id).is_some()
    }

    // ------------------------------------------------------------------
    // Cart items
    // ------------------------------------------------------------------

    pub async fn cart_items_for_user(&self, user_id: i32) -> Vec<CartItem> {
        self.inner
            .read()
            .await
            .cart_items
            .values()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn add_cart_item(&self, user_id: i32, new: NewCartItem) -> CartItem {
        let mut inner = self.inner.write().await;
        let id = inner.counters.cart_items;
        inner.counters.cart_items += 1;

        let item = CartItem {
            id,
            user_id,
            product_id: new.product_id,
            quantity: new.quantity,
        };
        inner.cart_items.insert(id, item.clone());
        item
    }

    pub async fn update_cart_item(&self, id: i32, quantity: i32) -> Option<CartItem> {
        let mut inner = self.inner.write().await;
        let item = inner.cart_items.get_mut(&id)?;
        item.quantity = quantity;
        Some(item.clone())
    }

    pub async fn remove_cart_item(&self, id: i32) -> bool {
        self.inner.write().await.cart_items.remove(&id).is_some()
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Stores the caller-computed total verbatim; nothing is recomputed or
    /// checked against the cart here.
    pub async fn create_order(&self, user_id: i32, new: NewOrder) -> Order {
        let mut inner = self.inner.write().await;
        let id = inner.counters.orders;
        inner.counters.orders += 1;

        let order = Order {
            id,
            user_id,
            status: new.status,
            total: new.total,
        };
        inner.orders.insert(id, order.clone());
        order
    }

    pub async fn orders_for_user(&self, user_id: i32) -> Vec<Order> {
        self.inner
            .read()
            .await
            .orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect()
    }
}

fn sample_catalog() -> Vec<NewProduct> {
    let product = |name: &str, description: &str, price: Decimal, image: &str, category: &str, stock: i32| {
        NewProduct {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image: image.to_string(),
            category: category.to_string(),
            stock,
        }
    };

    vec![
        product(
            "Wireless Headphones",
            "Over-ear Bluetooth headphones with active noise cancellation and 30-hour battery life.",
            Decimal::new(12999, 2),
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e",
            "Electronics",
            50,
        ),
        product(
            "Mechanical Keyboard",
            "Tenkeyless mechanical keyboard with hot-swappable switches and PBT keycaps.",
            Decimal::new(8999, 2),
            "https://images.unsplash.com/photo-1587829741301-dc798b83add3",
            "Electronics",
            35,
        ),
        product(
            "Smart Watch",
            "Fitness tracking watch with heart rate monitoring and a week of battery.",
            Decimal::new(19999, 2),
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30",
            "Electronics",
            20,
        ),
        product(
            "Canvas Backpack",
            "Water-resistant canvas backpack with padded 15-inch laptop sleeve.",
            Decimal::new(5999, 2),
            "https://images.unsplash.com/photo-1553062407-98eeb64c6a62",
            "Accessories",
            80,
        ),
        product(
            "Leather Wallet",
            "Slim bifold wallet in full-grain leather with RFID shielding.",
            Decimal::new(4999, 2),
            "https://images.unsplash.com/photo-1627123424574-724758594e93",
            "Accessories",
            45,
        ),
        product(
            "Desk Lamp",
            "Adjustable LED desk lamp with three color temperatures and a USB charging port.",
            Decimal::new(3999, 2),
            "https://images.unsplash.com/photo-1507473885765-e6ed057f782c",
            "Home",
            64,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: "A test product".to_string(),
            price: Decimal::new(1099, 2),
            image: "https://example.com/p.jpg".to_string(),
            category: "Test".to_string(),
            stock: 10,
        }
    }

    #[tokio::test]
    async fn test_product_ids_are_sequential() {
        let store = Store::new();
        let a = store.create_product(new_product("a")).await;
        let b = store.create_product(new_product("b")).await;
        let c = store.create_product(new_product("c")).await;

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_never_reused() {
        let store = Store::new();
        let a = store.create_product(new_product("a")).await;
        assert!(store.delete_product(a.id).await);

        let b = store.create_product(new_product("b")).await;
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_delete_absent_product_returns_false() {
        let store = Store::new();
        assert!(!store.delete_product(42).await);
        assert!(!store.remove_cart_item(42).await);
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let store = Store::new();
        let created = store.create_product(new_product("original")).await;

        let updated = store
            .update_product(
                created.id,
                ProductUpdate {
                    price: Some(Decimal::new(500, 2)),
                    stock: Some(3),
                    ..ProductUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "original");
        assert_eq!(updated.category, "Test");
        assert_eq!(updated.price, Decimal::new(500, 2));
        assert_eq!(updated.stock, 3);
    }

    #[tokio::test]
    async fn test_update_absent_product_is_none() {
        let store = Store::new();
        let result = store.update_product(7, ProductUpdate::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_cart_items_filtered_by_user() {
        let store = Store::new();
        let item = NewCartItem {
            product_id: 1,
            quantity: 2,
        };
        store.add_cart_item(1, item.clone()).await;
        store.add_cart_item(1, item.clone()).await;
        store.add_cart_item(2, item).await;

        assert_eq!(store.cart_items_for_user(1).await.len(), 2);
        assert_eq!(store.cart_items_for_user(2).await.len(), 1);
        assert!(store.cart_items_for_user(3).await.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_adds_are_separate_rows() {
        let store = Store::new();
        let item = NewCartItem {
            product_id: 9,
            quantity: 1,
        };
        let first = store.add_cart_item(1, item.clone()).await;
        let second = store.add_cart_item(1, item).await;

        assert_ne!(first.id, second.id);
        assert_eq!(store.cart_items_for_user(1).await.len(), 2);
    }

    #[tokio::test]
    async fn test_orders_store_submitted_total() {
        let store = Store::new();
        let order = store
            .create_order(
                5,
                NewOrder {
                    status: "pending".to_string(),
                    total: Decimal::new(25998, 2),
                },
            )
            .await;

        assert_eq!(order.total, Decimal::new(25998, 2));
        assert_eq!(store.orders_for_user(5).await.len(), 1);
        assert!(store.orders_for_user(6).await.is_empty());
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = Store::new();
        let seed = SeedConfig::default();
        store.seed(&seed).await.unwrap();
        let products = store.list_products().await.len();

        store.seed(&seed).await.unwrap();
        assert_eq!(store.list_products().await.len(), products);

        let admin = store.get_user_by_username("admin").await.unwrap();
        assert!(admin.is_admin);
        assert_ne!(admin.password, "admin123");
    }
}
