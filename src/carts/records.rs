//! Cart Records
//!
//! Wire shapes as the backend sends them. Parsing is lenient; the
//! normalised [`models`](super::models) are what the rest of the crate uses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::carts::models::{CartId, CartItemId, ProductId, VariantId};

/// Cart Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    #[serde(alias = "_id")]
    pub id: CartId,

    #[serde(default)]
    pub items: Vec<CartItemRecord>,

    #[serde(default)]
    pub total_quantity: Option<u64>,

    #[serde(default)]
    pub total_amount: Option<Decimal>,
}

/// Cart Item Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRecord {
    #[serde(alias = "_id")]
    pub id: CartItemId,

    #[serde(default)]
    pub product_id: Option<ProductId>,

    #[serde(default)]
    pub variant_id: Option<VariantId>,

    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub size: Option<String>,

    #[serde(default)]
    pub price: Decimal,

    #[serde(default)]
    pub quantity: u32,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub image: Option<String>,
}
