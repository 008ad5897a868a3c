//! Drop-in replacements for axum's extractors whose rejections render as
//! [`Error`](crate::handler::Error) bodies.

mod enhanced_json;
mod enhanced_path;
mod enhanced_query;
mod validated_json;

pub use self::enhanced_json::Json;
pub use self::enhanced_path::Path;
pub use self::enhanced_query::Query;
pub use self::validated_json::ValidateJson;
