use restaurant_storefront::{
    config::AppConfig,
    dto::auth::{LoginRequest, RegisterRequest},
    state::Storefront,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,restaurant_storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let Some(path) = config.store_path.clone() else {
        anyhow::bail!("STOREFRONT_STORE_PATH must point at the store file to seed");
    };

    let email = std::env::var("STOREFRONT_DEMO_EMAIL").unwrap_or_else(|_| "user@example.com".into());
    let password = std::env::var("STOREFRONT_DEMO_PASSWORD").unwrap_or_else(|_| "user123".into());

    let mut storefront = Storefront::open(&config)?;
    ensure_user(&storefront, &email, &password)?;
    seed_cart(&mut storefront);
    seed_favorites(&mut storefront);

    println!(
        "Seed completed in {}. User: {email}, cart: {} items / {} руб, favorites: {}",
        path.display(),
        storefront.cart.count(),
        storefront.cart.total(),
        storefront.favorites.len(),
    );
    Ok(())
}

fn ensure_user(storefront: &Storefront, email: &str, password: &str) -> anyhow::Result<()> {
    if storefront.auth.find_user(email)?.is_some() {
        storefront.auth.login(LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })?;
        println!("Signed in existing user {email}");
        return Ok(());
    }

    storefront.auth.register(RegisterRequest {
        name: "Демо".into(),
        email: email.to_string(),
        password: password.to_string(),
        address: "ул. Примерная, 1".into(),
    })?;
    println!("Registered user {email}");
    Ok(())
}

fn seed_cart(storefront: &mut Storefront) {
    if !storefront.cart.is_empty() {
        return;
    }
    for id in ["set1", "roll1", "roll1", "drink2"] {
        storefront.cart.add_item(id);
    }
}

fn seed_favorites(storefront: &mut Storefront) {
    for id in ["pizza2", "hot-roll1"] {
        if !storefront.favorites.is_favorite(id) {
            storefront.favorites.toggle(id);
        }
    }
}
