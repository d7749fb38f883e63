//! Plain-text cart summary.

use std::fmt;

use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::store::CartState;

/// Render the cart as a table followed by its totals.
#[must_use]
pub fn render_cart(state: &CartState) -> String {
    CartSummary(state).to_string()
}

/// [`fmt::Display`] adapter for a [`CartState`].
#[derive(Debug, Clone, Copy)]
pub struct CartSummary<'a>(pub &'a CartState);

impl fmt::Display for CartSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        match &state.cart_id {
            Some(id) => writeln!(f, "Cart {id}")?,
            None => writeln!(f, "No cart yet")?,
        }

        if state.items.is_empty() {
            writeln!(f, "(empty)")?;
        } else {
            let mut builder = Builder::default();

            builder.push_record(["Item", "Product", "Variant", "Qty", "Price", "Line total"]);

            for item in &state.items {
                builder.push_record([
                    item.id.to_string(),
                    item.name.clone().unwrap_or_else(|| item.product_id.to_string()),
                    item.variant_id
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                    item.quantity.to_string(),
                    item.price.to_string(),
                    item.line_total().to_string(),
                ]);
            }

            let mut table = builder.build();

            table
                .with(Style::modern_rounded())
                .modify(Columns::new(3..), Alignment::right());

            writeln!(f, "{table}")?;
        }

        writeln!(f, "Items:    {}", state.total_quantity)?;
        writeln!(f, "Subtotal: {}", state.total_amount)?;

        if let Some(promotion) = &state.promotion {
            writeln!(
                f,
                "Discount: -{} ({})",
                state.discount_amount, promotion.code
            )?;
        }

        writeln!(f, "Total:    {}", state.payable_amount())?;

        if let Some(rejection) = &state.promotion_rejection {
            writeln!(
                f,
                "Promotion {} needs a minimum order of {}; add {} more",
                rejection.promotion.code,
                rejection.promotion.minimum_order(),
                rejection.shortfall
            )?;
        }

        if let Some(error) = &state.error {
            writeln!(f, "Error: {error}")?;
        }

        Ok(())
    }
}
