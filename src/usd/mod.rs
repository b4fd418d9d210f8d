mod attribute;
mod attribute_store;
mod prim;
mod prim_tree;
mod schema_base;
mod schema_registry;
mod stage;

pub use attribute::*;
pub use attribute_store::*;
pub use prim::*;
pub use prim_tree::*;
pub use schema_base::SchemaBase;
pub use schema_registry::*;
pub use stage::*;

pub(crate) use schema_base::declare_schema;
