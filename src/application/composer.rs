use crate::domain::order::{LineItem, Order, compute_total, validate};
use crate::error::{Result, TopUpError};
use rust_decimal::Decimal;

/// Which field of a link row an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Url,
    Amount,
}

/// Editable order draft: country selection plus a dynamic list of link rows.
///
/// Starts with exactly one empty row and never drops below one. `total` and
/// `errors` are derived values, recomputed on every read.
#[derive(Debug)]
pub struct OrderComposer {
    country: String,
    links: Vec<LineItem>,
    next_id: u64,
    ceiling: Decimal,
}

impl OrderComposer {
    pub fn new(ceiling: Decimal) -> Self {
        Self {
            country: String::new(),
            links: vec![LineItem::empty(1)],
            next_id: 2,
            ceiling,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn links(&self) -> &[LineItem] {
        &self.links
    }

    pub fn select_country(&mut self, country: &str) {
        self.country = country.to_string();
    }

    /// Appends a new empty row and returns its id.
    pub fn add_link(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.links.push(LineItem::empty(id));
        id
    }

    /// Removes the row with `id`. No-op when it is the last remaining row.
    pub fn remove_link(&mut self, id: u64) {
        if self.links.len() <= 1 {
            return;
        }
        self.links.retain(|link| link.id != id);
    }

    /// In-place field replace on the row with `id`. Unknown ids are ignored.
    pub fn update_link(&mut self, id: u64, field: LinkField, value: &str) {
        if let Some(link) = self.links.iter_mut().find(|link| link.id == id) {
            match field {
                LinkField::Url => link.url = value.to_string(),
                LinkField::Amount => link.amount = value.to_string(),
            }
        }
    }

    /// Id of the row at a zero-based position, for position-addressed edits.
    pub fn link_id_at(&self, index: usize) -> Option<u64> {
        self.links.get(index).map(|link| link.id)
    }

    pub fn total(&self) -> Decimal {
        compute_total(&self.links)
    }

    pub fn errors(&self) -> Vec<String> {
        validate(&self.country, &self.links, self.ceiling)
    }

    /// Snapshot of the draft as a submittable order.
    ///
    /// Rejected with the full error list while any validation error exists;
    /// rejection has no side effect.
    pub fn try_submit(&self) -> Result<Order> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(TopUpError::Validation(errors));
        }
        Ok(Order {
            country: self.country.clone(),
            links: self.links.clone(),
            total: self.total(),
        })
    }
}
