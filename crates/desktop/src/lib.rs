//! `tillpoint-desktop`
//!
//! **Responsibility:** the point-of-sale shop screen, minus the widgets.
//!
//! This crate provides:
//! - A headless shop model that owns the cart and the catalog view state
//! - Background catalog loading and debounced search, reported as messages
//! - Incremental cart view patches for front-ends
//! - A terminal front-end (`tillpoint` binary) built on top of it

pub mod cart_view;
pub mod config;
pub mod debounce;
pub mod error;
pub mod loader;
pub mod render;
pub mod shop;
pub mod types;

pub use cart_view::{CartRow, CartTotals, CartView, CartViewPatch, DecrementAction};
pub use config::{ConfigError, ShopConfig};
pub use debounce::Debouncer;
pub use error::{Notice, ShopError};
pub use loader::CatalogLoader;
pub use shop::PosShop;
pub use types::{
    CatalogView, CheckoutLine, CheckoutRequest, CloseChoice, FilterOption, ShopMessage,
};
