//! `tillpoint-core`: identifiers, money and the modelling traits every other
//! crate builds on. No IO lives here.

pub mod error;
pub mod id;
pub mod model;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, BrandId, CartId, CategoryId, StockId};
pub use model::{Aggregate, AggregateRoot, Entity, ValueObject};
pub use money::Money;
