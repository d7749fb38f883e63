//! Cart view-state and its transitions.
//!
//! Transitions are plain `&mut self` methods so they can be exercised without
//! any I/O; [`CartStore`](super::CartStore) applies them as responses land.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    carts::models::{Cart, CartId, CartItem},
    promotions::models::{Promotion, PromotionRejection},
    store::errors::CartError,
};

/// Snapshot of the client-side cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartState {
    /// Server-assigned cart id; absent until a cart exists.
    pub cart_id: Option<CartId>,

    /// Items as last reported by the backend.
    pub items: Vec<CartItem>,

    /// Sum of item quantities.
    pub total_quantity: u64,

    /// Cart total before discount.
    pub total_amount: Decimal,

    /// The active promotion, if any.
    pub promotion: Option<Promotion>,

    /// Advisory discount for the active promotion.
    pub discount_amount: Decimal,

    /// Terms and shortfall of the last promotion refused for minimum order.
    pub promotion_rejection: Option<PromotionRejection>,

    /// An operation is waiting on the backend.
    pub loading: bool,

    /// User-facing message of the last failed operation.
    pub error: Option<String>,
}

impl CartState {
    /// Total after discount.
    #[must_use]
    pub fn payable_amount(&self) -> Decimal {
        (self.total_amount - self.discount_amount).max(Decimal::ZERO)
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }

    pub(crate) fn pending(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn rejected(&mut self, error: &CartError) {
        self.loading = false;
        self.error = Some(error.to_string());
    }

    /// Replace the cart wholesale with the backend's answer.
    pub(crate) fn adopt_cart(&mut self, cart: Cart) {
        self.cart_id = Some(cart.id);
        self.items = cart.items;
        self.total_quantity = cart.total_quantity;
        self.total_amount = cart.total_amount;
        self.loading = false;

        self.reprice_promotion();
    }

    /// No cart exists for this visitor yet.
    pub(crate) fn no_cart(&mut self) {
        self.cart_id = None;
        self.clear_items();
    }

    /// The cart was emptied; its id stays valid.
    pub(crate) fn cleared(&mut self) {
        self.clear_items();
    }

    fn clear_items(&mut self) {
        self.items.clear();
        self.total_quantity = 0;
        self.total_amount = Decimal::ZERO;
        self.loading = false;

        self.reprice_promotion();
    }

    pub(crate) fn apply_promotion(&mut self, promotion: Promotion) {
        self.discount_amount = promotion.discount_for(self.total_amount);
        self.promotion = Some(promotion);
        self.promotion_rejection = None;
        self.loading = false;
    }

    pub(crate) fn reject_promotion(
        &mut self,
        rejection: Option<PromotionRejection>,
        error: &CartError,
    ) {
        self.remove_promotion();
        self.promotion_rejection = rejection;
        self.rejected(error);
    }

    pub(crate) fn remove_promotion(&mut self) {
        self.promotion = None;
        self.discount_amount = Decimal::ZERO;
        self.promotion_rejection = None;
    }

    /// Recompute the discount against the current total, dropping the
    /// promotion if the total no longer meets its minimum order.
    fn reprice_promotion(&mut self) {
        let Some(promotion) = self.promotion.take() else {
            self.discount_amount = Decimal::ZERO;
            return;
        };

        if let Some(rejection) = PromotionRejection::check(&promotion, self.total_amount) {
            tracing::info!(
                code = %promotion.code,
                shortfall = %rejection.shortfall,
                "cart total fell below promotion minimum; promotion dropped"
            );

            self.discount_amount = Decimal::ZERO;
            self.promotion_rejection = Some(rejection);

            return;
        }

        self.discount_amount = promotion.discount_for(self.total_amount);
        self.promotion = Some(promotion);
    }
}
