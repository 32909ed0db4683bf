use std::{cell::RefCell, rc::Rc, time::Duration};

use restaurant_storefront::{
    catalog::Catalog,
    config::AppConfig,
    events::{
        CartChange, CartChangeKind, EventBus, FavoritesChange, FavoritesChangeKind, Listener,
        Notification,
    },
    models::{Cart, Favorites},
    state::Storefront,
    store::{CART_KEY, FAVORITES_KEY, KeyValueStore, MemoryStore, read_json},
};

#[derive(Default)]
struct Recorder {
    carts: RefCell<Vec<(CartChangeKind, u64, u64)>>,
    favorites: RefCell<Vec<(FavoritesChangeKind, usize)>>,
    toasts: RefCell<Vec<(String, Duration)>>,
}

impl Listener for Recorder {
    fn cart_changed(&self, change: &CartChange<'_>) {
        self.carts
            .borrow_mut()
            .push((change.kind, change.cart.total, change.cart.count));
    }

    fn favorites_changed(&self, change: &FavoritesChange<'_>) {
        self.favorites
            .borrow_mut()
            .push((change.kind, change.favorites.len()));
    }

    fn notify(&self, notification: &Notification) {
        self.toasts
            .borrow_mut()
            .push((notification.to_string(), notification.ttl));
    }
}

fn page(store: Rc<MemoryStore>) -> (Storefront, Rc<Recorder>) {
    let recorder = Rc::new(Recorder::default());
    let mut storefront = Storefront::new(
        store,
        Rc::new(Catalog::builtin()),
        EventBus::new(Duration::from_secs(3)),
    );
    storefront.subscribe(recorder.clone());
    storefront.load();
    (storefront, recorder)
}

#[test]
fn listeners_see_post_mutation_state() {
    let (mut storefront, recorder) = page(MemoryStore::shared());

    storefront.cart.add_item("roll1");
    storefront.cart.add_item("roll1");
    storefront.cart.change_quantity("roll1", -1);
    storefront.cart.remove_item("roll1");

    assert_eq!(
        *recorder.carts.borrow(),
        vec![
            (CartChangeKind::Loaded, 0, 0),
            (CartChangeKind::ItemAdded, 260, 1),
            (CartChangeKind::ItemAdded, 520, 2),
            (CartChangeKind::QuantityChanged, 260, 1),
            (CartChangeKind::ItemRemoved, 0, 0),
        ]
    );

    let toasts = recorder.toasts.borrow();
    assert_eq!(toasts.len(), 2);
    assert_eq!(toasts[0].0, "\"Ролл с Авокадо\" добавлен в корзину");
    assert_eq!(toasts[0].1, Duration::from_secs(3));
}

#[test]
fn unknown_product_emits_nothing() {
    let (mut storefront, recorder) = page(MemoryStore::shared());
    storefront.cart.add_item("unknown-id");
    storefront.cart.change_quantity("unknown-id", -1);

    assert_eq!(recorder.carts.borrow().len(), 1);
    assert!(recorder.toasts.borrow().is_empty());
    assert_eq!(storefront.cart.cart(), &Cart::default());
}

#[test]
fn favorites_events_follow_membership() {
    let (mut storefront, recorder) = page(MemoryStore::shared());

    storefront.favorites.toggle("set1");
    assert_eq!(storefront.favorites.favorites().items, vec!["set1".to_string()]);
    storefront.favorites.toggle("set1");
    assert!(storefront.favorites.is_empty());

    assert_eq!(
        *recorder.favorites.borrow(),
        vec![
            (FavoritesChangeKind::Loaded, 0),
            (FavoritesChangeKind::Toggled, 1),
            (FavoritesChangeKind::Toggled, 0),
        ]
    );
    let toasts: Vec<String> = recorder.toasts.borrow().iter().map(|t| t.0.clone()).collect();
    assert!(toasts[0].ends_with("добавлен в избранное"));
    assert!(toasts[1].ends_with("удален из избранного"));
}

#[test]
fn state_survives_page_reload() {
    let store = MemoryStore::shared();
    let (mut first, _) = page(store.clone());
    first.cart.add_item("set2");
    first.cart.add_item("pizza1");
    first.cart.add_item("set2");
    first.favorites.toggle("poke2");
    let cart_before = first.cart.cart().clone();
    drop(first);

    let (second, _) = page(store.clone());
    assert_eq!(second.cart.cart(), &cart_before);
    let ids: Vec<&str> = second.cart.items().iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec!["set2", "pizza1"]);
    assert_eq!((second.cart.total(), second.cart.count()), (3940, 3));
    assert!(second.favorites.is_favorite("poke2"));

    let stored: Cart = read_json(&*store, CART_KEY).unwrap().unwrap();
    assert_eq!(stored, cart_before);
}

#[test]
fn malformed_payloads_load_as_empty() {
    let store = MemoryStore::shared();
    store.set(CART_KEY, "{\"items\":[{\"id\":\"roll1\",\"quantity\":-2}]}").unwrap();
    store.set(FAVORITES_KEY, "null").unwrap();

    let (storefront, recorder) = page(store);
    assert_eq!(storefront.cart.cart(), &Cart::default());
    assert_eq!(storefront.favorites.favorites(), &Favorites::default());
    assert_eq!(*recorder.carts.borrow(), vec![(CartChangeKind::Loaded, 0, 0)]);
}

#[test]
fn second_tab_overwrites_first() {
    let store = MemoryStore::shared();
    let (mut tab_a, _) = page(store.clone());
    let (mut tab_b, _) = page(store.clone());

    tab_a.cart.add_item("hot1");
    tab_b.cart.add_item("dessert1");

    let stored: Cart = read_json(&*store, CART_KEY).unwrap().unwrap();
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].id(), "dessert1");
    assert_eq!(tab_a.cart.items()[0].id(), "hot1");
}

#[test]
fn file_backed_storefront_reopens() {
    let dir = std::env::temp_dir().join(format!("storefront-it-{}", uuid::Uuid::new_v4()));
    let config = AppConfig {
        store_path: Some(dir.join("local-storage.json")),
        ..AppConfig::default()
    };

    {
        let mut storefront = Storefront::open(&config).unwrap();
        storefront.cart.add_item("hot-roll3");
        storefront.favorites.toggle("hot-roll3");
    }

    let storefront = Storefront::open(&config).unwrap();
    assert_eq!(storefront.cart.total(), 497);
    assert!(storefront.favorites.is_favorite("hot-roll3"));

    let _ = std::fs::remove_dir_all(dir);
}
