//! Cart store.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use tokio::sync::{Mutex, MutexGuard, watch};
use tracing::{debug, info, warn};

use crate::{
    auth::Credentials,
    carts::{
        CartsClient,
        models::{AddCartItem, Cart, CartId, CartItemId, NewCartItem},
    },
    promotions::{PromotionsClient, models::PromotionRejection},
    session::{SessionId, SessionIdentity},
    store::{
        errors::{
            ADD_FAILED, CLEAR_FAILED, CREATE_FAILED, CartError, EMPTY_PROMOTION, FETCH_FAILED,
            MERGE_FAILED, REMOVE_FAILED, UPDATE_FAILED,
        },
        state::CartState,
    },
};

/// Client-side owner of the cart snapshot.
///
/// Remote operations run one at a time in call order: each waits for the
/// previous one's response to be applied before it reads the cart id or
/// talks to the backend. Reads never wait.
///
/// [`reset`](Self::reset) and [`remove_promotion`](Self::remove_promotion)
/// act immediately. Responses of an operation already in flight when they
/// run are discarded instead of overwriting their result.
pub struct CartStore {
    carts: Arc<dyn CartsClient>,
    promotions: Arc<dyn PromotionsClient>,
    session: SessionIdentity,
    credentials: Credentials,
    state: watch::Sender<CartState>,
    gate: Mutex<()>,
    cart_epoch: AtomicU64,
    promotion_epoch: AtomicU64,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("credentials", &self.credentials)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// A remote operation holding the gate.
///
/// Writes go through the operation so they can be dropped once the state
/// they were computed against has been reset.
struct Operation<'a> {
    store: &'a CartStore,
    cart_epoch: u64,
    promotion_epoch: u64,
    _gate: MutexGuard<'a, ()>,
}

impl Operation<'_> {
    fn is_current(&self) -> bool {
        self.store.cart_epoch.load(Ordering::SeqCst) == self.cart_epoch
    }

    fn update(&self, transition: impl FnOnce(&mut CartState)) {
        self.store.state.send_if_modified(|state| {
            if !self.is_current() {
                debug!("cart was reset while the request was in flight; discarding response");
                return false;
            }

            transition(state);
            true
        });
    }

    /// Like [`update`](Self::update), but a promotion removed since the
    /// operation began stays removed.
    fn update_promotion(&self, transition: impl FnOnce(&mut CartState)) {
        self.store.state.send_if_modified(|state| {
            if !self.is_current() {
                return false;
            }

            if self.store.promotion_epoch.load(Ordering::SeqCst) != self.promotion_epoch {
                debug!("promotion was removed while validating; discarding response");

                state.loading = false;
                return true;
            }

            transition(state);
            true
        });
    }

    fn adopt(&self, cart: Cart) {
        self.update(|state| state.adopt_cart(cart));
    }

    /// Record a failure in the state before handing the result back.
    fn settle<T>(&self, result: Result<T, CartError>) -> Result<T, CartError> {
        if let Err(error) = &result {
            self.update(|state| state.rejected(error));
        }

        result
    }
}

impl CartStore {
    /// Create a store with an empty cart; nothing is fetched until asked.
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsClient>,
        promotions: Arc<dyn PromotionsClient>,
        session: SessionIdentity,
        credentials: Credentials,
    ) -> Self {
        Self {
            carts,
            promotions,
            session,
            credentials,
            state: watch::Sender::new(CartState::default()),
            gate: Mutex::new(()),
            cart_epoch: AtomicU64::new(0),
            promotion_epoch: AtomicU64::new(0),
        }
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.borrow().clone()
    }

    /// Receive a notification on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    /// The credentials deciding whether requests are made as a guest.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Load the visitor's cart from the backend.
    ///
    /// A visitor without a cart ends up with an empty cart and no error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails for any reason other than the
    /// cart not existing, or if the guest session cannot be read.
    #[tracing::instrument(name = "cart.fetch", skip(self), err)]
    pub async fn fetch(&self) -> Result<(), CartError> {
        let op = self.begin().await;

        self.fetch_locked(&op).await
    }

    /// Add an item, creating the cart first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `item.quantity` is zero, the initial fetch fails,
    /// or the backend rejects the item.
    #[tracing::instrument(
        name = "cart.add_item",
        skip(self, item),
        fields(product_id = %item.product_id, quantity = item.quantity),
        err
    )]
    pub async fn add_item(&self, item: AddCartItem) -> Result<(), CartError> {
        let op = self.begin().await;

        if item.quantity == 0 {
            return op.settle(Err(CartError::InvalidQuantity));
        }

        if self.cart_id().is_none() {
            self.fetch_locked(&op).await?;
        }

        let result = self.add_item_locked(&op, item).await;

        op.settle(result)
    }

    /// Set an item's quantity. Callers clamp to available stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoCart`] or [`CartError::InvalidQuantity`]
    /// without contacting the backend, or the backend's failure.
    #[tracing::instrument(
        name = "cart.update_quantity",
        skip(self, item),
        fields(item_id = %item),
        err
    )]
    pub async fn update_quantity(&self, item: CartItemId, quantity: u32) -> Result<(), CartError> {
        let op = self.begin().await;

        let Some(cart) = self.cart_id() else {
            return op.settle(Err(CartError::NoCart));
        };

        if quantity == 0 {
            return op.settle(Err(CartError::InvalidQuantity));
        }

        op.update(CartState::pending);

        let result = self
            .carts
            .update_item_quantity(cart, item, quantity)
            .await
            .map_err(|error| CartError::from_client(error, UPDATE_FAILED))
            .map(|cart| op.adopt(cart));

        op.settle(result)
    }

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoCart`] without contacting the backend, or the
    /// backend's failure.
    #[tracing::instrument(name = "cart.remove_item", skip(self, item), fields(item_id = %item), err)]
    pub async fn remove_item(&self, item: CartItemId) -> Result<(), CartError> {
        let op = self.begin().await;

        let Some(cart) = self.cart_id() else {
            return op.settle(Err(CartError::NoCart));
        };

        op.update(CartState::pending);

        let result = self
            .carts
            .remove_item(cart, item)
            .await
            .map_err(|error| CartError::from_client(error, REMOVE_FAILED))
            .map(|cart| op.adopt(cart));

        op.settle(result)
    }

    /// Empty the cart. Succeeds without a request when no cart exists.
    ///
    /// # Errors
    ///
    /// Returns the backend's failure.
    #[tracing::instrument(name = "cart.clear", skip(self), err)]
    pub async fn clear_cart(&self) -> Result<(), CartError> {
        let op = self.begin().await;

        let Some(cart) = self.cart_id() else {
            return Ok(());
        };

        op.update(CartState::pending);

        let result = self
            .carts
            .clear_cart(cart.clone())
            .await
            .map_err(|error| CartError::from_client(error, CLEAR_FAILED))
            .map(|()| {
                info!(cart_id = %cart, "cleared cart");

                op.update(CartState::cleared);
            });

        op.settle(result)
    }

    /// Fold the guest cart into the signed-in user's cart and consume the
    /// guest session.
    ///
    /// Does nothing when there is no guest session, or when nobody is signed
    /// in; a guest keeps the session for a merge after signing in.
    ///
    /// # Errors
    ///
    /// Returns the backend's failure, or a storage error if the session
    /// cannot be read or deleted.
    #[tracing::instrument(name = "cart.merge_guest", skip(self), err)]
    pub async fn merge_guest_cart(&self) -> Result<(), CartError> {
        let op = self.begin().await;

        if !self.credentials.is_authenticated() {
            debug!("not signed in; nothing to merge into");

            return Ok(());
        }

        let session = match self.session.current() {
            Ok(Some(session)) => session,
            Ok(None) => return Ok(()),
            Err(error) => return op.settle(Err(error.into())),
        };

        op.update(CartState::pending);

        let result = self.merge_locked(&op, session).await;

        op.settle(result)
    }

    /// Validate `code` and make it the active promotion.
    ///
    /// The new promotion replaces any active one; a refused code leaves no
    /// promotion active.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::MinimumOrderNotMet`] carrying the promotion's
    /// terms when the cart total is too low, [`CartError::Validation`] with
    /// the backend's reason when the code is refused, or a server error.
    #[tracing::instrument(name = "cart.apply_promotion", skip(self), err)]
    pub async fn apply_promotion(&self, code: &str) -> Result<(), CartError> {
        let op = self.begin().await;

        let code = code.trim();

        if code.is_empty() {
            let error = CartError::Validation {
                message: EMPTY_PROMOTION.to_string(),
            };

            op.update(|state| state.reject_promotion(None, &error));

            return Err(error);
        }

        op.update(CartState::pending);

        let promotion = match self.promotions.validate(code.to_string()).await {
            Ok(promotion) => promotion,
            Err(error) => {
                let error = CartError::from_promotion(error);

                op.update_promotion(|state| state.reject_promotion(None, &error));

                return Err(error);
            }
        };

        let total = self.state.borrow().total_amount;

        if let Some(rejection) = PromotionRejection::check(&promotion, total) {
            let error = CartError::MinimumOrderNotMet {
                rejection: Box::new(rejection.clone()),
            };

            op.update_promotion(|state| state.reject_promotion(Some(rejection), &error));

            return Err(error);
        }

        info!(code = %promotion.code, "applied promotion");

        op.update_promotion(|state| state.apply_promotion(promotion));

        Ok(())
    }

    /// Drop the active promotion. Local only; a validation still in flight
    /// will not reinstate a promotion.
    pub fn remove_promotion(&self) {
        self.state.send_modify(|state| {
            self.promotion_epoch.fetch_add(1, Ordering::SeqCst);
            state.remove_promotion();
        });
    }

    /// Forget the error of the last failed operation. Local only.
    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }

    /// Return to the initial empty state, e.g. after signing out. Local only;
    /// responses to requests already in flight are discarded.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            self.cart_epoch.fetch_add(1, Ordering::SeqCst);
            self.promotion_epoch.fetch_add(1, Ordering::SeqCst);
            *state = CartState::default();
        });
    }

    /// Wait for the gate. Epochs are read under the state lock so they match
    /// the state the operation starts from.
    async fn begin(&self) -> Operation<'_> {
        let gate = self.gate.lock().await;

        let (cart_epoch, promotion_epoch) = {
            let _state = self.state.borrow();

            (
                self.cart_epoch.load(Ordering::SeqCst),
                self.promotion_epoch.load(Ordering::SeqCst),
            )
        };

        Operation {
            store: self,
            cart_epoch,
            promotion_epoch,
            _gate: gate,
        }
    }

    async fn fetch_locked(&self, op: &Operation<'_>) -> Result<(), CartError> {
        op.update(CartState::pending);

        let result = self.load_remote_cart().await.map(|cart| match cart {
            Some(cart) => op.adopt(cart),
            None => {
                info!("no cart yet; starting empty");

                op.update(CartState::no_cart);
            }
        });

        op.settle(result)
    }

    async fn load_remote_cart(&self) -> Result<Option<Cart>, CartError> {
        if self.credentials.is_authenticated() {
            return match self.carts.fetch_my_cart().await {
                Ok(cart) => Ok(Some(cart)),
                Err(error) if error.is_not_found() => self.bootstrap_cart().await,
                Err(error) => Err(CartError::from_client(error, FETCH_FAILED)),
            };
        }

        let session = self.session.get_or_create()?;

        match self.carts.fetch_guest_cart(session).await {
            Ok(cart) => Ok(Some(cart)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(CartError::from_client(error, FETCH_FAILED)),
        }
    }

    /// The backend has no create-cart call; adding the placeholder item makes
    /// it create an empty cart for the signed-in user.
    async fn bootstrap_cart(&self) -> Result<Option<Cart>, CartError> {
        info!("user has no cart; creating one");

        match self.carts.add_item(None, NewCartItem::bootstrap()).await {
            Ok(cart) => Ok(Some(cart)),
            Err(error) if error.is_not_found() => {
                warn!("cart creation reported not found; starting empty");

                Ok(None)
            }
            Err(error) => Err(CartError::from_client(error, CREATE_FAILED)),
        }
    }

    async fn add_item_locked(&self, op: &Operation<'_>, item: AddCartItem) -> Result<(), CartError> {
        op.update(CartState::pending);

        let session = if self.credentials.is_authenticated() {
            None
        } else {
            Some(self.session.get_or_create()?)
        };

        let cart = self
            .carts
            .add_item(self.cart_id(), NewCartItem::new(item, session))
            .await
            .map_err(|error| CartError::from_client(error, ADD_FAILED))?;

        op.adopt(cart);

        Ok(())
    }

    async fn merge_locked(&self, op: &Operation<'_>, session: SessionId) -> Result<(), CartError> {
        let cart = self
            .carts
            .merge_guest_cart(session.clone())
            .await
            .map_err(|error| CartError::from_client(error, MERGE_FAILED))?;

        info!(cart_id = %cart.id, session_id = %session, "merged guest cart");

        op.adopt(cart);
        self.session.forget()?;

        Ok(())
    }

    fn cart_id(&self) -> Option<CartId> {
        self.state.borrow().cart_id.clone()
    }
}
