//! Request extractors that reject with the API's JSON error body.

mod json;
mod path_id;

pub use json::AppJson;
pub use path_id::{PathId, PathIds};
