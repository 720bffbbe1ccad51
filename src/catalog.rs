use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::cart::CartItem;
use crate::error::CoreError;
use crate::store::{DocumentStore, StoreHandle, VersionCheck};

const PRODUCTS: &str = "products";

// ============================================================================
// Product Catalog
// ============================================================================
//
// Browse/read path for customers, CRUD for the admin dashboard. Products are
// reference data keyed by product id; writes are unconditional.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub description: String,
}

impl Product {
    /// Build the cart line for this product at the chosen quantity.
    pub fn cart_item(&self, quantity: u32) -> Result<CartItem, CoreError> {
        CartItem::new(
            self.id.clone(),
            self.name.clone(),
            self.image.clone(),
            self.category.clone(),
            self.description.clone(),
            self.price,
            quantity,
        )
    }
}

#[derive(Clone)]
pub struct ProductCatalog {
    store: StoreHandle,
}

impl ProductCatalog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store: StoreHandle::new(store),
        }
    }

    /// Every product, in stable key order.
    pub async fn list(&self) -> Result<Vec<Product>, CoreError> {
        let products: Vec<(String, Product)> = self.store.list_all(PRODUCTS).await?;
        Ok(products.into_iter().map(|(_, product)| product).collect())
    }

    pub async fn get(&self, product_id: &str) -> Result<Product, CoreError> {
        let (product, _version) = self.store.require(PRODUCTS, product_id, "product").await?;
        Ok(product)
    }

    pub async fn upsert(&self, product: &Product) -> Result<(), CoreError> {
        if product.id.trim().is_empty() {
            return Err(CoreError::validation("product id cannot be blank"));
        }
        if product.name.trim().is_empty() {
            return Err(CoreError::validation("product name cannot be blank"));
        }
        if product.price < Decimal::ZERO {
            return Err(CoreError::validation("product price cannot be negative"));
        }

        self.store
            .save(PRODUCTS, &product.id, product, VersionCheck::Any)
            .await?;
        tracing::info!(product_id = %product.id, price = %product.price, "product saved");
        Ok(())
    }

    pub async fn remove(&self, product_id: &str) -> Result<(), CoreError> {
        self.store.delete(PRODUCTS, product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use rust_decimal_macros::dec;

    fn catalog() -> ProductCatalog {
        ProductCatalog::new(Arc::new(InMemoryStore::new()))
    }

    fn milk() -> Product {
        Product {
            id: "p-milk".to_string(),
            name: "Milk".to_string(),
            price: dec!(1.20),
            image: "milk.png".to_string(),
            category: "Dairy".to_string(),
            description: "1L whole milk".to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_then_get_and_list() {
        let products = catalog();
        products.upsert(&milk()).await.unwrap();

        assert_eq!(products.get("p-milk").await.unwrap(), milk());
        assert_eq!(products.list().await.unwrap(), vec![milk()]);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_product() {
        let products = catalog();
        products.upsert(&milk()).await.unwrap();

        let mut cheaper = milk();
        cheaper.price = dec!(0.99);
        products.upsert(&cheaper).await.unwrap();

        assert_eq!(products.get("p-milk").await.unwrap().price, dec!(0.99));
    }

    #[tokio::test]
    async fn removed_product_is_gone() {
        let products = catalog();
        products.upsert(&milk()).await.unwrap();
        products.remove("p-milk").await.unwrap();

        let err = products.get("p-milk").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "product", .. }));
    }

    #[tokio::test]
    async fn invalid_products_are_rejected() {
        let products = catalog();

        let mut bad = milk();
        bad.price = dec!(-1);
        assert!(products.upsert(&bad).await.is_err());

        let mut blank = milk();
        blank.name = "  ".to_string();
        assert!(products.upsert(&blank).await.is_err());
    }

    #[test]
    fn cart_item_carries_price_and_quantity() {
        let item = milk().cart_item(3).unwrap();
        assert_eq!(item.product_id, "p-milk");
        assert_eq!(item.line_total, dec!(3.60));
        assert!(milk().cart_item(0).is_err());
    }
}
