use std::rc::Rc;

use crate::{
    catalog::Catalog,
    config::AppConfig,
    events::{EventBus, Listener},
    services::{
        auth_service::AuthService, cart_service::CartManager,
        favorite_service::FavoritesManager, order_service::OrderService,
    },
    store::{SharedStore, StoreResult},
};

/// Everything one page view works with.
///
/// The store handle, catalog and event bus are shared by the managers built
/// here; nothing is global, so two contexts over the same store behave like
/// two browser tabs.
pub struct Storefront {
    pub store: SharedStore,
    pub catalog: Rc<Catalog>,
    pub events: EventBus,
    pub cart: CartManager,
    pub favorites: FavoritesManager,
    pub auth: AuthService,
    pub orders: OrderService,
}

impl Storefront {
    /// Builds the context without touching stored state. Subscribe listeners,
    /// then call [`Storefront::load`].
    pub fn new(store: SharedStore, catalog: Rc<Catalog>, events: EventBus) -> Self {
        let auth = AuthService::new(store.clone());
        Self {
            cart: CartManager::new(store.clone(), catalog.clone(), events.clone()),
            favorites: FavoritesManager::new(store.clone(), catalog.clone(), events.clone()),
            orders: OrderService::new(store.clone(), auth.clone()),
            auth,
            store,
            catalog,
            events,
        }
    }

    /// Opens the configured store and loads cart and favorites from it.
    pub fn open(config: &AppConfig) -> StoreResult<Self> {
        let store = config.open_store()?;
        let mut storefront = Self::new(
            store,
            Rc::new(Catalog::builtin()),
            EventBus::new(config.notification_ttl),
        );
        storefront.load();
        Ok(storefront)
    }

    pub fn subscribe(&self, listener: Rc<dyn Listener>) {
        self.events.subscribe(listener);
    }

    pub fn load(&mut self) {
        self.cart.load();
        self.favorites.load();
    }
}
