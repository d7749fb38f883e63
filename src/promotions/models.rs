//! Promotion Models

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places discount amounts are rounded to.
pub const DISCOUNT_DECIMAL_PLACES: u32 = 2;

/// How a promotion's value is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// `discount_value` is a percentage of the cart total.
    Percentage,

    /// `discount_value` is an absolute amount.
    Fixed,
}

/// A validated promotion code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,

    #[serde(default)]
    pub minimum_order: Option<Decimal>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl Promotion {
    /// Minimum cart total required, zero when unrestricted.
    #[must_use]
    pub fn minimum_order(&self) -> Decimal {
        self.minimum_order.unwrap_or(Decimal::ZERO).max(Decimal::ZERO)
    }

    /// How far `total` falls short of the minimum order, if at all.
    #[must_use]
    pub fn shortfall(&self, total: Decimal) -> Option<Decimal> {
        let minimum = self.minimum_order();

        (minimum > total).then(|| minimum - total)
    }

    /// Discount this promotion grants on `total`.
    ///
    /// Never negative and never more than `total`.
    #[must_use]
    pub fn discount_for(&self, total: Decimal) -> Decimal {
        if total <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let raw = match self.discount_type {
            DiscountType::Percentage => total
                .checked_mul(self.discount_value)
                .and_then(|applied| applied.checked_div(Decimal::ONE_HUNDRED))
                .map_or(total, |applied| {
                    applied.round_dp_with_strategy(
                        DISCOUNT_DECIMAL_PLACES,
                        RoundingStrategy::MidpointAwayFromZero,
                    )
                }),
            DiscountType::Fixed => self.discount_value,
        };

        raw.max(Decimal::ZERO).min(total)
    }
}

/// A validated promotion refused because the cart total is below its
/// minimum order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRejection {
    pub promotion: Promotion,
    pub total_amount: Decimal,
    pub shortfall: Decimal,
}

impl PromotionRejection {
    /// Build a rejection if `promotion` cannot apply to `total`.
    #[must_use]
    pub fn check(promotion: &Promotion, total: Decimal) -> Option<Self> {
        promotion.shortfall(total).map(|shortfall| Self {
            promotion: promotion.clone(),
            total_amount: total,
            shortfall,
        })
    }
}
