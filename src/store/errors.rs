//! Cart store errors.

use thiserror::Error;

use crate::{
    http::ClientError, promotions::models::PromotionRejection, storage::StorageError,
};

/// Errors surfaced by [`CartStore`](super::CartStore) operations.
///
/// The `Display` output is the user-facing message recorded in
/// [`CartState::error`](super::CartState::error).
#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart not found")]
    NotFound,

    #[error("no cart has been created yet")]
    NoCart,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("{message}")]
    Validation { message: String },

    #[error(
        "order total is {} short of the minimum for promotion {}",
        .rejection.shortfall,
        .rejection.promotion.code
    )]
    MinimumOrderNotMet { rejection: Box<PromotionRejection> },

    #[error("{message}")]
    Server {
        message: String,
        #[source]
        source: ClientError,
    },

    #[error("session storage is unavailable")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Interpret a cart client failure. `fallback` is shown when the backend
    /// did not explain itself.
    pub(crate) fn from_client(error: ClientError, fallback: &str) -> Self {
        if error.is_not_found() {
            return Self::NotFound;
        }

        Self::Server {
            message: error.server_message().unwrap_or(fallback).to_string(),
            source: error,
        }
    }

    /// Interpret a promotion validation failure.
    ///
    /// Any 4xx answer is the backend refusing the code; everything else is a
    /// transport or server problem.
    pub(crate) fn from_promotion(error: ClientError) -> Self {
        match error.status() {
            Some(status) if status.is_client_error() => Self::Validation {
                message: error
                    .server_message()
                    .unwrap_or(INVALID_PROMOTION)
                    .to_string(),
            },
            _ => Self::Server {
                message: error
                    .server_message()
                    .unwrap_or(PROMOTION_UNAVAILABLE)
                    .to_string(),
                source: error,
            },
        }
    }

    /// The structured shortfall payload, for minimum-order rejections.
    #[must_use]
    pub fn rejection(&self) -> Option<&PromotionRejection> {
        match self {
            Self::MinimumOrderNotMet { rejection } => Some(rejection.as_ref()),
            _ => None,
        }
    }
}

pub(crate) const FETCH_FAILED: &str = "Failed to load cart";
pub(crate) const CREATE_FAILED: &str = "Failed to create cart";
pub(crate) const ADD_FAILED: &str = "Failed to add item to cart";
pub(crate) const UPDATE_FAILED: &str = "Failed to update cart item";
pub(crate) const REMOVE_FAILED: &str = "Failed to remove cart item";
pub(crate) const CLEAR_FAILED: &str = "Failed to clear cart";
pub(crate) const MERGE_FAILED: &str = "Failed to merge guest cart";
pub(crate) const INVALID_PROMOTION: &str = "Invalid promotion code";
pub(crate) const EMPTY_PROMOTION: &str = "Please enter a promotion code";
const PROMOTION_UNAVAILABLE: &str = "Failed to validate promotion code";
