use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Cart Aggregate
// ============================================================================
//
// One cart per customer, deduplicated by product id. Adding a product that
// is already present replaces its quantity outright (last selection wins);
// removing an absent product is a no-op.
//
// ============================================================================

/// One product line in a cart. `line_total` is always derived from
/// `unit_price * quantity` at construction; it is never mutated on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub category: String,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, CoreError> {
        if quantity < 1 {
            return Err(CoreError::validation("quantity must be at least 1"));
        }
        if unit_price < Decimal::ZERO {
            return Err(CoreError::validation("unit price cannot be negative"));
        }

        Ok(Self {
            product_id: product_id.into(),
            name: name.into(),
            image: image.into(),
            category: category.into(),
            description: description.into(),
            unit_price,
            quantity,
            line_total: unit_price * Decimal::from(quantity),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add an item; an existing line for the same product is replaced.
    pub fn add_item(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    /// Remove the line for a product. No-op when absent.
    pub fn remove_item(&mut self, product_id: &str) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Remove the lines for the given products. No-op for absent ids.
    pub fn remove_products(&mut self, product_ids: &[String]) {
        self.items
            .retain(|item| !product_ids.contains(&item.product_id));
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line totals. Pure.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.line_total).sum()
    }
}
