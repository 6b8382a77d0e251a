//! Catalog tool implementations
//!
//! Thin, metadata-annotated wrappers over the catalog client. All
//! cross-cutting behavior (logging, argument checks, confirmation,
//! caching, batching) comes from the dispatch framework; the code here
//! only shapes arguments and results.

pub mod entities;
pub mod locations;

use serde::de::DeserializeOwned;
use serde_json::Value;

use catalog_dispatch::{Candidate, MetadataRegistry, ToolError};

pub use entities::{
    GetEntitiesTool, GetEntityByRefTool, RemoveEntityByUidTool, ValidateEntityTool,
};
pub use locations::{AddLocationTool, ListLocationsTool};

/// Metadata registry covering every tool this server ships.
pub fn metadata_registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    entities::register_metadata(&mut registry);
    locations::register_metadata(&mut registry);
    registry
}

/// All candidate tools, in registration order.
pub fn candidates() -> Vec<Candidate> {
    vec![
        Candidate::of(GetEntitiesTool),
        Candidate::of(GetEntityByRefTool),
        Candidate::of(ValidateEntityTool),
        Candidate::of(RemoveEntityByUidTool),
        Candidate::of(AddLocationTool),
        Candidate::of(ListLocationsTool),
    ]
}

/// Deserialize tool arguments, treating absent arguments as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::invalid_args(format!("invalid arguments: {e}")))
}
