use std::rc::Rc;

use crate::{
    catalog::Catalog,
    events::{CartChange, CartChangeKind, EventBus, NotificationKind},
    models::{Cart, CartLine},
    store::{CART_KEY, SharedStore, read_json, save_json},
};

/// Owns the cart of one page context.
///
/// Every mutation recomputes the totals from scratch, writes the whole cart
/// back to the store and publishes a [`CartChange`]. Nothing here returns an
/// error: unknown products are ignored and store failures are only logged.
pub struct CartManager {
    store: SharedStore,
    catalog: Rc<Catalog>,
    events: EventBus,
    cart: Cart,
}

impl CartManager {
    /// Creates a manager holding an empty cart. Call [`CartManager::load`] to
    /// pick up persisted state.
    pub fn new(store: SharedStore, catalog: Rc<Catalog>, events: EventBus) -> Self {
        Self {
            store,
            catalog,
            events,
            cart: Cart::default(),
        }
    }

    pub fn load(&mut self) {
        let stored = match read_json::<Cart>(&*self.store, CART_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "cart read failed");
                None
            }
        };

        let mut cart = stored.unwrap_or_default();
        if cart.checked_total().is_none() {
            tracing::warn!("stored cart total overflows, starting empty");
            cart = Cart::default();
        }
        cart.normalize();

        self.cart = cart;
        self.publish(CartChangeKind::Loaded, None);
    }

    pub fn add_item(&mut self, product_id: &str) {
        let Some(product) = self.catalog.get(product_id).cloned() else {
            tracing::debug!(product_id, "ignoring unknown product");
            return;
        };
        let name = product.name.clone();

        match self.line_mut(product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.cart.items.push(CartLine::new(product)),
        }

        self.commit(CartChangeKind::ItemAdded, product_id);
        self.events.notify(NotificationKind::AddedToCart { name });
    }

    /// Adds `delta` to the line's quantity. A result of zero or less removes
    /// the line.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        let Some(line) = self.line_mut(product_id) else {
            return;
        };

        let quantity = i64::from(line.quantity).saturating_add(delta);
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        self.commit(CartChangeKind::QuantityChanged, product_id);
    }

    pub fn remove_item(&mut self, product_id: &str) {
        self.cart.items.retain(|line| line.id() != product_id);
        self.commit(CartChangeKind::ItemRemoved, product_id);
    }

    /// Empties the cart and drops its stored copy altogether.
    pub fn clear(&mut self) {
        self.cart = Cart::default();
        if let Err(err) = self.store.remove(CART_KEY) {
            tracing::warn!(error = %err, "cart remove failed");
        }
        self.publish(CartChangeKind::Cleared, None);
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[CartLine] {
        &self.cart.items
    }

    pub fn total(&self) -> u64 {
        self.cart.total
    }

    pub fn count(&self) -> u64 {
        self.cart.count
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.cart.line(product_id)
    }

    pub fn line_total(&self, product_id: &str) -> Option<u64> {
        self.line(product_id).map(CartLine::line_total)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.cart.items.iter_mut().find(|line| line.id() == product_id)
    }

    fn commit(&mut self, kind: CartChangeKind, product_id: &str) {
        self.cart.recalculate();
        if let Err(err) = save_json(&*self.store, CART_KEY, &self.cart) {
            tracing::warn!(error = %err, "cart save failed");
        }
        self.publish(kind, Some(product_id));
    }

    fn publish(&self, kind: CartChangeKind, product_id: Option<&str>) {
        self.events.cart_changed(CartChange {
            kind,
            product_id,
            cart: &self.cart,
        });
    }
}
