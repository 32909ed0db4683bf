use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }
}

/// One page of a listing plus where it sits in the full result.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T> Listing<T> {
    /// Cuts the page described by `(page, per_page, offset)` out of `all`.
    pub fn paginate(all: Vec<T>, (page, per_page, offset): (i64, i64, i64)) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(per_page.max(0) as usize)
            .collect();
        Self {
            items,
            meta: Meta::new(page, per_page, total),
        }
    }
}
