//! Cart panel state, kept in step with cart events.
//!
//! Front-ends apply the emitted patches to their row widgets instead of
//! rebuilding the whole panel on every change.

use tillpoint_cart::{Cart, CartEvent, CartItem};
use tillpoint_core::{Money, StockId};

pub const EMPTY_CART_PLACEHOLDER: &str = "No items in cart yet";

/// What the row's minus button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementAction {
    Decrement,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRow {
    pub stock_id: StockId,
    pub product_name: String,
    /// Line total.
    pub price_label: String,
    /// `xN`.
    pub quantity_label: String,
    pub decrement: DecrementAction,
}

impl CartRow {
    pub fn from_item(item: &CartItem) -> Self {
        Self {
            stock_id: item.stock_id,
            product_name: item.product_name.clone(),
            price_label: item.line_total().to_string(),
            quantity_label: format!("x{}", item.quantity),
            decrement: if item.quantity == 1 {
                DecrementAction::Remove
            } else {
                DecrementAction::Decrement
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    pub quantity: i64,
    pub price_label: String,
}

impl Default for CartTotals {
    fn default() -> Self {
        Self {
            quantity: 0,
            price_label: Money::ZERO.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartViewPatch {
    /// Replace every row (an empty list means show the placeholder).
    Rebuild(Vec<CartRow>),
    InsertRow(CartRow),
    UpdateRow(CartRow),
    RemoveRow(StockId),
    Totals(CartTotals),
}

/// Mirror of the cart's rows and totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    lines: Vec<CartItem>,
    rows: Vec<CartRow>,
}

impl CartView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            lines: cart.items().to_vec(),
            rows: Self::rows(cart),
        }
    }

    /// Full row list for `cart`, in insertion order.
    pub fn rows(cart: &Cart) -> Vec<CartRow> {
        cart.items().iter().map(CartRow::from_item).collect()
    }

    pub fn displayed_rows(&self) -> &[CartRow] {
        &self.rows
    }

    /// Totals over the mirrored lines, saturating like the cart's own.
    pub fn totals(&self) -> CartTotals {
        let quantity = self
            .lines
            .iter()
            .fold(0i64, |total, line| total.saturating_add(line.quantity));
        let price: Money = self.lines.iter().map(CartItem::line_total).sum();
        CartTotals {
            quantity,
            price_label: price.to_string(),
        }
    }

    pub fn shows_placeholder(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fold one cart event into the view, returning the patches a front-end
    /// needs to apply.
    pub fn apply(&mut self, event: &CartEvent) -> Vec<CartViewPatch> {
        let mut patches = match event {
            CartEvent::ItemAdded(added) => {
                let row = CartRow::from_item(&added.item);
                self.lines.push(added.item.clone());
                self.rows.push(row.clone());
                if self.rows.len() == 1 {
                    vec![CartViewPatch::Rebuild(self.rows.clone())]
                } else {
                    vec![CartViewPatch::InsertRow(row)]
                }
            }
            CartEvent::QuantityIncreased(change)
            | CartEvent::ItemIncremented(change)
            | CartEvent::QuantityDecreased(change)
            | CartEvent::ItemDecremented(change) => {
                let current = &change.current;
                let row = CartRow::from_item(current);
                let idx = self.position(current.stock_id);
                match idx.and_then(|idx| self.lines.get_mut(idx).zip(self.rows.get_mut(idx))) {
                    Some((line, slot)) => {
                        *line = current.clone();
                        *slot = row.clone();
                        vec![CartViewPatch::UpdateRow(row)]
                    }
                    None => {
                        tracing::warn!(stock_id = %row.stock_id, "cart view out of step; rebuilding");
                        self.lines.push(current.clone());
                        self.rows.push(row);
                        vec![CartViewPatch::Rebuild(self.rows.clone())]
                    }
                }
            }
            CartEvent::ItemRemoved(removed) => {
                let stock_id = removed.item.stock_id;
                self.lines.retain(|line| line.stock_id != stock_id);
                self.rows.retain(|row| row.stock_id != stock_id);
                if self.rows.is_empty() {
                    vec![CartViewPatch::Rebuild(Vec::new())]
                } else {
                    vec![CartViewPatch::RemoveRow(stock_id)]
                }
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
                self.rows.clear();
                return vec![CartViewPatch::Rebuild(Vec::new())];
            }
        };

        patches.push(CartViewPatch::Totals(self.totals()));
        patches
    }

    fn position(&self, stock_id: StockId) -> Option<usize> {
        self.lines.iter().position(|line| line.stock_id == stock_id)
    }
}
