//! Explicit request-body validation, one function per entity. Each returns
//! the typed payload or the list of field errors that becomes the 400 body.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::error::FieldError;
use crate::models::{CartItemUpdate, NewCartItem, NewOrder, NewProduct, NewUser, ProductUpdate};

/// Decode a JSON body into an all-optional raw shape. A type mismatch is
/// reported as a single body-level field error rather than a transport 422.
fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, Vec<FieldError>> {
    serde_json::from_value(value).map_err(|e| vec![FieldError::new("body", e.to_string())])
}

fn required(field: &str) -> FieldError {
    FieldError::new(field, "Required")
}

fn check_string(value: Option<&str>, field: &str, errors: &mut Vec<FieldError>) {
    match value {
        None => errors.push(required(field)),
        Some(s) if s.trim().is_empty() => {
            errors.push(FieldError::new(field, "Must not be empty"));
        }
        Some(_) => {}
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawProduct {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    image: Option<String>,
    category: Option<String>,
    stock: Option<i32>,
}

pub fn validate_new_product(value: Value) -> Result<NewProduct, Vec<FieldError>> {
    let raw: RawProduct = decode(value)?;
    let mut errors = Vec::new();

    check_string(raw.name.as_deref(), "name", &mut errors);
    check_string(raw.description.as_deref(), "description", &mut errors);
    check_string(raw.image.as_deref(), "image", &mut errors);
    check_string(raw.category.as_deref(), "category", &mut errors);

    match raw.price {
        None => errors.push(required("price")),
        Some(price) if price < Decimal::ZERO => {
            errors.push(FieldError::new("price", "Must not be negative"));
        }
        Some(_) => {}
    }

    match raw.stock {
        None => errors.push(required("stock")),
        Some(stock) if stock < 0 => {
            errors.push(FieldError::new("stock", "Must not be negative"));
        }
        Some(_) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewProduct {
        name: raw.name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        price: raw.price.unwrap_or_default(),
        image: raw.image.unwrap_or_default(),
        category: raw.category.unwrap_or_default(),
        stock: raw.stock.unwrap_or_default(),
    })
}

pub fn validate_product_update(value: Value) -> Result<ProductUpdate, Vec<FieldError>> {
    let update: ProductUpdate = decode(value)?;
    let mut errors = Vec::new();

    if let Some(name) = update.name.as_deref()
        && name.trim().is_empty()
    {
        errors.push(FieldError::new("name", "Must not be empty"));
    }

    if let Some(price) = update.price
        && price < Decimal::ZERO
    {
        errors.push(FieldError::new("price", "Must not be negative"));
    }

    if let Some(stock) = update.stock
        && stock < 0
    {
        errors.push(FieldError::new("stock", "Must not be negative"));
    }

    if errors.is_empty() { Ok(update) } else { Err(errors) }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCartItem {
    product_id: Option<i32>,
    quantity: Option<i32>,
}

pub fn validate_new_cart_item(value: Value) -> Result<NewCartItem, Vec<FieldError>> {
    let raw: RawCartItem = decode(value)?;
    let mut errors = Vec::new();

    if raw.product_id.is_none() {
        errors.push(required("productId"));
    }

    match raw.quantity {
        None => errors.push(required("quantity")),
        Some(quantity) if quantity < 1 => {
            errors.push(FieldError::new("quantity", "Must be at least 1"));
        }
        Some(_) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewCartItem {
        product_id: raw.product_id.unwrap_or_default(),
        quantity: raw.quantity.unwrap_or_default(),
    })
}

pub fn validate_cart_item_update(value: Value) -> Result<CartItemUpdate, Vec<FieldError>> {
    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct RawUpdate {
        quantity: Option<i32>,
    }

    let raw: RawUpdate = decode(value)?;
    match raw.quantity {
        None => Err(vec![required("quantity")]),
        Some(quantity) if quantity < 1 => Err(vec![FieldError::new(
            "quantity",
            "Must be at least 1",
        )]),
        Some(quantity) => Ok(CartItemUpdate { quantity }),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawOrder {
    status: Option<String>,
    total: Option<Decimal>,
}

pub fn validate_new_order(value: Value) -> Result<NewOrder, Vec<FieldError>> {
    let raw: RawOrder = decode(value)?;
    let mut errors = Vec::new();

    check_string(raw.status.as_deref(), "status", &mut errors);

    match raw.total {
        None => errors.push(required("total")),
        Some(total) if total < Decimal::ZERO => {
            errors.push(FieldError::new("total", "Must not be negative"));
        }
        Some(_) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewOrder {
        status: raw.status.unwrap_or_default(),
        total: raw.total.unwrap_or_default(),
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCredentials {
    username: Option<String>,
    password: Option<String>,
}

pub fn validate_credentials(value: Value) -> Result<NewUser, Vec<FieldError>> {
    let raw: RawCredentials = decode(value)?;
    let mut errors = Vec::new();

    check_string(raw.username.as_deref(), "username", &mut errors);
    check_string(raw.password.as_deref(), "password", &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewUser {
        username: raw.username.unwrap_or_default(),
        password: raw.password.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_new_product() {
        let valid = json!({
            "name": "Mug",
            "description": "Ceramic mug",
            "price": "19.99",
            "image": "https://example.com/mug.jpg",
            "category": "Home",
            "stock": 12
        });
        let product = validate_new_product(valid).unwrap();
        assert_eq!(product.price, Decimal::new(1999, 2));

        let errors = validate_new_product(json!({"name": "Mug"})).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "price"));
        assert!(errors.iter().any(|e| e.field == "stock"));

        let errors = validate_new_product(json!({
            "name": "Mug",
            "description": "d",
            "price": "-1.00",
            "image": "i",
            "category": "c",
            "stock": -3
        }))
        .unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_product_update() {
        let update = validate_product_update(json!({"stock": 7})).unwrap();
        assert_eq!(update.stock, Some(7));
        assert!(update.name.is_none());

        assert!(validate_product_update(json!({"price": "-0.01"})).is_err());
        assert!(validate_product_update(json!({"name": "  "})).is_err());
        assert!(validate_product_update(json!({})).is_ok());
    }

    #[test]
    fn test_validate_new_cart_item() {
        let item = validate_new_cart_item(json!({"productId": 3, "quantity": 2})).unwrap();
        assert_eq!(item.product_id, 3);

        assert!(validate_new_cart_item(json!({"productId": 3, "quantity": 0})).is_err());
        assert!(validate_new_cart_item(json!({"quantity": 1})).is_err());
    }

    #[test]
    fn test_validate_cart_item_update() {
        assert!(validate_cart_item_update(json!({"quantity": 5})).is_ok());
        assert!(validate_cart_item_update(json!({"quantity": 0})).is_err());
        assert!(validate_cart_item_update(json!({})).is_err());
    }

    #[test]
    fn test_validate_new_order() {
        let order = validate_new_order(json!({"status": "pending", "total": "259.98"})).unwrap();
        assert_eq!(order.total, Decimal::new(25998, 2));

        assert!(validate_new_order(json!({"status": "pending"})).is_err());
        assert!(validate_new_order(json!({"status": "", "total": "1.00"})).is_err());
        assert!(validate_new_order(json!({"status": "pending", "total": "-1"})).is_err());
    }

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials(json!({"username": "bob", "password": "pw"})).is_ok());
        assert!(validate_credentials(json!({"username": "bob"})).is_err());
        assert!(validate_credentials(json!({"username": " ", "password": "pw"})).is_err());
    }

    #[test]
    fn test_type_mismatch_is_a_body_error() {
        let errors = validate_new_cart_item(json!({"productId": "three"})).unwrap_err();
        assert_eq!(errors[0].field, "body");
    }
}
