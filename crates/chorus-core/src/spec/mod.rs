//! Agent specification synthesis: category table, builder, and the
//! resulting immutable [`AgentSpec`].

mod builder;
mod category;
mod model;

pub use builder::SpecBuilder;
pub use category::{Category, CategoryTable};
pub use model::{AgentFunction, AgentSpec};
