//! Change notifications for the presentation layer.
//!
//! Managers publish here after every mutation; whatever renders counters,
//! cart pages or toasts subscribes with a [`Listener`].

use std::{cell::RefCell, fmt, rc::Rc, time::Duration};

use crate::models::{Cart, Favorites};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChangeKind {
    Loaded,
    ItemAdded,
    QuantityChanged,
    ItemRemoved,
    Cleared,
}

impl CartChangeKind {
    /// Whether a full cart page should be redrawn, as opposed to only the
    /// header counters.
    pub fn needs_rerender(self) -> bool {
        matches!(
            self,
            CartChangeKind::QuantityChanged | CartChangeKind::ItemRemoved | CartChangeKind::Cleared
        )
    }
}

#[derive(Debug)]
pub struct CartChange<'a> {
    pub kind: CartChangeKind,
    pub product_id: Option<&'a str>,
    pub cart: &'a Cart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesChangeKind {
    Loaded,
    Toggled,
    Removed,
    Cleared,
}

#[derive(Debug)]
pub struct FavoritesChange<'a> {
    pub kind: FavoritesChangeKind,
    pub product_id: Option<&'a str>,
    pub favorites: &'a Favorites,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    AddedToCart { name: String },
    FavoriteAdded { name: String },
    FavoriteRemoved { name: String },
}

/// Transient, advisory message. Listeners are expected to dismiss it after
/// `ttl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub ttl: Duration,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NotificationKind::AddedToCart { name } => write!(f, "\"{name}\" добавлен в корзину"),
            NotificationKind::FavoriteAdded { name } => write!(f, "\"{name}\" добавлен в избранное"),
            NotificationKind::FavoriteRemoved { name } => {
                write!(f, "\"{name}\" удален из избранного")
            }
        }
    }
}

/// Subscriber hooks. Every hook has an empty default so a listener only
/// implements what it renders.
pub trait Listener {
    fn cart_changed(&self, _change: &CartChange<'_>) {}

    fn favorites_changed(&self, _change: &FavoritesChange<'_>) {}

    fn notify(&self, _notification: &Notification) {}
}

pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Fans events out to every subscribed listener, in subscription order.
#[derive(Clone)]
pub struct EventBus {
    listeners: Rc<RefCell<Vec<Rc<dyn Listener>>>>,
    notification_ttl: Duration,
}

impl EventBus {
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
            notification_ttl,
        }
    }

    pub fn subscribe(&self, listener: Rc<dyn Listener>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // Snapshot so a listener may subscribe another one while being called.
    fn snapshot(&self) -> Vec<Rc<dyn Listener>> {
        self.listeners.borrow().clone()
    }

    pub fn cart_changed(&self, change: CartChange<'_>) {
        tracing::trace!(kind = ?change.kind, count = change.cart.count, total = change.cart.total, "cart changed");
        for listener in self.snapshot() {
            listener.cart_changed(&change);
        }
    }

    pub fn favorites_changed(&self, change: FavoritesChange<'_>) {
        tracing::trace!(kind = ?change.kind, len = change.favorites.len(), "favorites changed");
        for listener in self.snapshot() {
            listener.favorites_changed(&change);
        }
    }

    pub fn notify(&self, kind: NotificationKind) {
        let notification = Notification {
            kind,
            ttl: self.notification_ttl,
        };
        tracing::debug!(message = %notification, "notification");
        for listener in self.snapshot() {
            listener.notify(&notification);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .field("notification_ttl", &self.notification_ttl)
            .finish()
    }
}
