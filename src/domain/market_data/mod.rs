//! Market data aggregate: entities, value objects, indicator math and the
//! source/feed abstractions.

pub mod entities;
pub mod indicator_engine;
pub mod payload;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use indicator_engine::*;
pub use value_objects::*;
