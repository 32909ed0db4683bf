use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
}
