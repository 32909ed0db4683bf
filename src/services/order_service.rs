use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::orders::CheckoutRequest,
    error::{AppError, AppResult},
    models::{Customer, Order, OrderStatus},
    params::{OrderListQuery, SortOrder},
    response::Listing,
    services::{auth_service::AuthService, cart_service::CartManager},
    store::{ORDERS_KEY, SharedStore, read_json, save_json},
};

/// Checkout and order history over the shared order list.
#[derive(Clone)]
pub struct OrderService {
    store: SharedStore,
    auth: AuthService,
}

impl OrderService {
    pub fn new(store: SharedStore, auth: AuthService) -> Self {
        Self { store, auth }
    }

    /// Turns the cart into an order for the signed-in user and empties the
    /// cart. Nothing is written unless every check passes.
    pub fn checkout(&self, cart: &mut CartManager, payload: CheckoutRequest) -> AppResult<Order> {
        let mut user = self.auth.require_user()?;

        if cart.is_empty() {
            return Err(AppError::bad_request("Cart is empty"));
        }

        let customer = Customer {
            name: payload.name.trim().to_string(),
            phone: payload.phone.trim().to_string(),
            address: payload.address.trim().to_string(),
        };
        if customer.name.is_empty() || customer.phone.is_empty() || customer.address.is_empty() {
            return Err(AppError::bad_request("Name, phone and address are required"));
        }

        let mut orders = self.all_orders()?;

        let id = Uuid::new_v4();
        let order = Order {
            id,
            invoice_number: build_invoice_number(id),
            user_id: user.email.clone(),
            created_at: Utc::now(),
            items: cart.items().to_vec(),
            customer,
            total: cart.total(),
            status: OrderStatus::Processing,
        };
        orders.push(order.clone());
        save_json(&*self.store, ORDERS_KEY, &orders)?;

        user.name = order.customer.name.clone();
        user.phone = order.customer.phone.clone();
        user.address = order.customer.address.clone();
        self.auth.save_user(&user)?;

        cart.clear();

        tracing::info!(
            order_id = %order.id,
            invoice = %order.invoice_number,
            user = %order.user_id,
            total = order.total,
            "checkout completed"
        );
        Ok(order)
    }

    /// The signed-in user's orders, newest first unless asked otherwise.
    pub fn list_orders(&self, query: OrderListQuery) -> AppResult<Listing<Order>> {
        let user = self.auth.require_user()?;

        let mut orders: Vec<Order> = self
            .all_orders()?
            .into_iter()
            .filter(|o| o.user_id == user.email)
            .filter(|o| query.status.is_none_or(|status| o.status == status))
            .collect();

        // Stored order breaks timestamp ties.
        orders.sort_by_key(|o| o.created_at);
        if let SortOrder::Desc = query.sort_order.unwrap_or(SortOrder::Desc) {
            orders.reverse();
        }

        Ok(Listing::paginate(orders, query.pagination.normalize()))
    }

    pub fn get_order(&self, id: Uuid) -> AppResult<Order> {
        let user = self.auth.require_user()?;
        self.all_orders()?
            .into_iter()
            .find(|o| o.id == id && o.user_id == user.email)
            .ok_or(AppError::NotFound)
    }

    fn all_orders(&self) -> AppResult<Vec<Order>> {
        Ok(read_json(&*self.store, ORDERS_KEY)?.unwrap_or_default())
    }
}

fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8])
}
