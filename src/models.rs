use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Sets,
    ColdRolls,
    HotRolls,
    Pizza,
    Poke,
    Hot,
    Dessert,
    Drinks,
    /// Any tag this build does not know, kept so the line it belongs to
    /// still loads.
    #[serde(other)]
    Unknown,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Sets,
        Category::ColdRolls,
        Category::HotRolls,
        Category::Pizza,
        Category::Poke,
        Category::Hot,
        Category::Dessert,
        Category::Drinks,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Category::Sets => "sets",
            Category::ColdRolls => "cold-rolls",
            Category::HotRolls => "hot-rolls",
            Category::Pizza => "pizza",
            Category::Poke => "poke",
            Category::Hot => "hot",
            Category::Dessert => "dessert",
            Category::Drinks => "drinks",
            Category::Unknown => "unknown",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Localized display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Sets => "Сеты",
            Category::ColdRolls => "Холодные роллы",
            Category::HotRolls => "Горячие роллы",
            Category::Pizza => "Пицца",
            Category::Poke => "Поке",
            Category::Hot => "Горячее",
            Category::Dessert => "Десерт",
            Category::Drinks => "Напитки",
            Category::Unknown => "",
        }
    }
}

/// Display label for a raw category tag; unknown tags map to an empty label.
pub fn category_label(tag: &str) -> &'static str {
    Category::from_tag(tag).map(Category::label).unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub category: Category,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A product in the cart. The product fields are copied at the time it is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: ProductRecord,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: ProductRecord) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// Price times quantity, saturating at `u64::MAX`.
    pub fn line_total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }

    pub fn checked_line_total(&self) -> Option<u64> {
        self.product.price.checked_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub count: u64,
}

impl Cart {
    /// Recomputes `total` and `count` from the lines. Both saturate at
    /// `u64::MAX`.
    pub fn recalculate(&mut self) {
        self.total = self
            .items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.line_total()));
        self.count = self
            .items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(u64::from(line.quantity)));
    }

    /// Sum of the line totals, or `None` if it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.items
            .iter()
            .try_fold(0u64, |acc, line| acc.checked_add(line.checked_line_total()?))
    }

    /// Drops lines that cannot exist in a valid cart: zero quantities and
    /// repeated product ids (the first line for an id wins).
    pub(crate) fn normalize(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.items
            .retain(|line| line.quantity > 0 && seen.insert(line.product.id.clone()));
        self.recalculate();
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id() == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorites {
    pub items: Vec<String>,
}

impl Favorites {
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|id| id == product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

/// Points at the signed-in user's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Processing => "В обработке",
            OrderStatus::Delivered => "Доставлен",
            OrderStatus::Cancelled => "Отменён",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub invoice_number: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartLine>,
    pub customer: Customer,
    pub total: u64,
    pub status: OrderStatus,
}

impl Order {
    /// Total recomputed from the order lines.
    pub fn items_total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.line_total()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: u64) -> ProductRecord {
        ProductRecord {
            id: id.into(),
            name: id.to_uppercase(),
            price,
            category: Category::Pizza,
            image: format!("../res/images/{id}.jpg"),
            description: None,
        }
    }

    #[test]
    fn category_labels_cover_all_tags() {
        for category in Category::ALL {
            assert_eq!(Category::from_tag(category.tag()), Some(category));
            assert_eq!(category_label(category.tag()), category.label());
        }
        assert_eq!(category_label("sushi-burgers"), "");
        assert_eq!(Category::from_tag("unknown"), None);
        assert_eq!(Category::Unknown.label(), "");
    }

    #[test]
    fn unknown_category_tag_still_decodes() {
        let line: CartLine = serde_json::from_str(
            r#"{"id":"x1","name":"X","price":10,"category":"sushi-burgers","image":"x.jpg","quantity":2}"#,
        )
        .unwrap();
        assert_eq!(line.product.category, Category::Unknown);
        assert_eq!(line.product.category.label(), "");
        assert_eq!(line.line_total(), 20);
    }

    #[test]
    fn oversized_totals_saturate_or_report_overflow() {
        let mut cart = Cart {
            items: vec![
                CartLine { product: product("a", u64::MAX), quantity: 2 },
                CartLine { product: product("b", u64::MAX / 2), quantity: 1 },
            ],
            ..Default::default()
        };
        assert_eq!(cart.items[0].checked_line_total(), None);
        assert_eq!(cart.items[0].line_total(), u64::MAX);
        assert_eq!(cart.checked_total(), None);

        cart.recalculate();
        assert_eq!(cart.total, u64::MAX);
        assert_eq!(cart.count, 3);

        cart.items.remove(0);
        cart.items.push(CartLine { product: product("c", u64::MAX / 2 + 2), quantity: 1 });
        assert_eq!(cart.checked_total(), None);
    }

    #[test]
    fn cart_line_serializes_flat() {
        let line = CartLine {
            product: product("pizza1", 740),
            quantity: 2,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["id"], "pizza1");
        assert_eq!(json["category"], "pizza");
        assert_eq!(json["quantity"], 2);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn normalize_drops_zero_and_duplicate_lines() {
        let mut cart = Cart {
            items: vec![
                CartLine { product: product("a", 100), quantity: 2 },
                CartLine { product: product("b", 50), quantity: 0 },
                CartLine { product: product("a", 100), quantity: 5 },
            ],
            total: 9999,
            count: 42,
        };
        cart.normalize();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, 200);
        assert_eq!(cart.count, 2);
    }
}
