//! Plain-text tables for the terminal front-end.

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};

use crate::cart_view::{CartView, DecrementAction, EMPTY_CART_PLACEHOLDER};
use crate::error::Notice;
use crate::types::{CatalogView, CheckoutRequest, FilterOption};

pub const SOLD_OUT_LABEL: &str = "sold out";

pub fn catalog_table(view: &CatalogView) -> String {
    let items = match view {
        CatalogView::Loading => return "Loading catalog...".to_string(),
        CatalogView::NoResults => return "No products match the current search.".to_string(),
        CatalogView::Failed(reason) => return format!("Catalog unavailable: {reason}"),
        CatalogView::Ready(items) => items,
    };

    let mut builder = Builder::default();
    builder.push_record(["ID", "Product", "Brand", "Category", "Stock", "Price"]);
    for item in items {
        let stock = if item.is_in_stock() {
            item.quantity.to_string()
        } else {
            SOLD_OUT_LABEL.to_string()
        };
        builder.push_record([
            item.stock_id.to_string(),
            item.item_name.clone(),
            item.brand_name.clone(),
            item.category_name.clone(),
            stock,
            item.unit_price.to_string(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(4..6), Alignment::right());
    table.to_string()
}

pub fn cart_table(view: &CartView) -> String {
    if view.shows_placeholder() {
        return EMPTY_CART_PLACEHOLDER.to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["ID", "Product", "Qty", "Total", ""]);
    for row in view.displayed_rows() {
        let action = match row.decrement {
            DecrementAction::Decrement => "dec",
            DecrementAction::Remove => "remove",
        };
        builder.push_record([
            row.stock_id.to_string(),
            row.product_name.clone(),
            row.quantity_label.clone(),
            row.price_label.clone(),
            action.to_string(),
        ]);
    }

    let totals = view.totals();
    builder.push_record([
        String::new(),
        "Total".to_string(),
        format!("x{}", totals.quantity),
        totals.price_label,
        String::new(),
    ]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..4), Alignment::right());
    table.modify(Rows::last(), Alignment::right());
    table.to_string()
}

pub fn filter_list(title: &str, options: &[FilterOption]) -> String {
    let entries: Vec<String> = options
        .iter()
        .map(|option| {
            let mark = if option.selected { "x" } else { " " };
            format!("[{mark}] {}", option.name)
        })
        .collect();

    if entries.is_empty() {
        format!("{title}: (none)")
    } else {
        format!("{title}: {}", entries.join("  "))
    }
}

pub fn checkout_summary(request: &CheckoutRequest) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Product", "Qty", "Unit", "Total"]);
    for line in &request.lines {
        builder.push_record([
            line.product_name.clone(),
            line.quantity.to_string(),
            line.unit_price.to_string(),
            line.line_total.to_string(),
        ]);
    }
    builder.push_record([
        "Total".to_string(),
        request.total_quantity.to_string(),
        String::new(),
        request.total_price.to_string(),
    ]);

    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..4), Alignment::right());
    format!("Checkout {}\n{table}", request.id)
}

pub fn notice(notice: &Notice) -> String {
    format!("!! {}: {}", notice.title, notice.message)
}
