use std::rc::Rc;

use crate::{
    catalog::Catalog,
    events::{EventBus, FavoritesChange, FavoritesChangeKind, NotificationKind},
    models::{Favorites, ProductRecord},
    store::{FAVORITES_KEY, SharedStore, read_json, save_json},
};

/// Owns the favorited product ids of one page context.
pub struct FavoritesManager {
    store: SharedStore,
    catalog: Rc<Catalog>,
    events: EventBus,
    favorites: Favorites,
}

impl FavoritesManager {
    pub fn new(store: SharedStore, catalog: Rc<Catalog>, events: EventBus) -> Self {
        Self {
            store,
            catalog,
            events,
            favorites: Favorites::default(),
        }
    }

    pub fn load(&mut self) {
        let stored = match read_json::<Favorites>(&*self.store, FAVORITES_KEY) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(error = %err, "favorites read failed");
                None
            }
        };

        let mut favorites = stored.unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        favorites.items.retain(|id| seen.insert(id.clone()));

        self.favorites = favorites;
        self.publish(FavoritesChangeKind::Loaded, None);
    }

    /// Flips membership of `product_id` and returns whether it is now a
    /// favorite. Ids unknown to the catalog still toggle, without a
    /// notification.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        let added = match self.position(product_id) {
            Some(index) => {
                self.favorites.items.remove(index);
                false
            }
            None => {
                self.favorites.items.push(product_id.to_string());
                true
            }
        };

        self.persist();
        self.publish(FavoritesChangeKind::Toggled, Some(product_id));

        if let Some(product) = self.catalog.get(product_id) {
            let name = product.name.clone();
            self.events.notify(if added {
                NotificationKind::FavoriteAdded { name }
            } else {
                NotificationKind::FavoriteRemoved { name }
            });
        }

        added
    }

    pub fn remove(&mut self, product_id: &str) {
        let Some(index) = self.position(product_id) else {
            return;
        };
        self.favorites.items.remove(index);
        self.persist();
        self.publish(FavoritesChangeKind::Removed, Some(product_id));
    }

    pub fn clear(&mut self) {
        self.favorites.items.clear();
        self.persist();
        self.publish(FavoritesChangeKind::Cleared, None);
    }

    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.favorites.contains(product_id)
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Favorited products in the order they were added, skipping ids the
    /// catalog no longer knows.
    pub fn products(&self) -> Vec<&ProductRecord> {
        self.favorites
            .items
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.favorites.items.iter().position(|id| id == product_id)
    }

    fn persist(&self) {
        if let Err(err) = save_json(&*self.store, FAVORITES_KEY, &self.favorites) {
            tracing::warn!(error = %err, "favorites save failed");
        }
    }

    fn publish(&self, kind: FavoritesChangeKind, product_id: Option<&str>) {
        self.events.favorites_changed(FavoritesChange {
            kind,
            product_id,
            favorites: &self.favorites,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        events::{Listener, Notification},
        store::{KeyValueStore, MemoryStore},
    };

    #[derive(Default)]
    struct Toasts(RefCell<Vec<String>>);

    impl Listener for Toasts {
        fn notify(&self, notification: &Notification) {
            self.0.borrow_mut().push(notification.to_string());
        }
    }

    fn manager() -> (Rc<MemoryStore>, Rc<Toasts>, FavoritesManager) {
        let store = MemoryStore::shared();
        let toasts = Rc::new(Toasts::default());
        let events = EventBus::default();
        events.subscribe(toasts.clone());
        let manager = FavoritesManager::new(store.clone(), Rc::new(Catalog::builtin()), events);
        (store, toasts, manager)
    }

    #[test]
    fn toggle_is_self_inverse() {
        let (store, toasts, mut favorites) = manager();
        favorites.load();

        assert!(favorites.toggle("set1"));
        assert_eq!(favorites.favorites().items, vec!["set1".to_string()]);
        assert!(favorites.is_favorite("set1"));

        assert!(!favorites.toggle("set1"));
        assert!(favorites.is_empty());

        let stored: Favorites = read_json(&*store, FAVORITES_KEY).unwrap().unwrap();
        assert!(stored.items.is_empty());
        assert_eq!(
            *toasts.0.borrow(),
            vec![
                "\"Сет \"Домашний\"\" добавлен в избранное".to_string(),
                "\"Сет \"Домашний\"\" удален из избранного".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_id_toggles_without_notification() {
        let (_, toasts, mut favorites) = manager();
        favorites.load();

        assert!(favorites.toggle("retired-dish"));
        assert!(favorites.is_favorite("retired-dish"));
        assert!(favorites.products().is_empty());
        assert!(toasts.0.borrow().is_empty());
    }

    #[test]
    fn load_falls_back_and_dedups() {
        let (store, _, mut favorites) = manager();
        store.set(FAVORITES_KEY, "[\"set1\"]").unwrap();
        favorites.load();
        assert!(favorites.is_empty());

        store
            .set(FAVORITES_KEY, r#"{"items":["pizza1","set2","pizza1"]}"#)
            .unwrap();
        favorites.load();
        assert_eq!(favorites.len(), 2);
        let products = favorites.products();
        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["pizza1", "set2"]);
    }

    #[test]
    fn remove_and_clear_persist() {
        let (store, _, mut favorites) = manager();
        favorites.load();
        favorites.toggle("drink1");
        favorites.toggle("drink2");

        favorites.remove("drink1");
        favorites.remove("drink1");
        assert_eq!(favorites.favorites().items, vec!["drink2".to_string()]);

        favorites.clear();
        let stored: Favorites = read_json(&*store, FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(stored, Favorites::default());
    }
}
