pub mod id;
pub mod text;

pub use id::{generate_default_id, generate_id};
