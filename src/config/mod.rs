pub mod schema;

pub use schema::{Config, ConfigOverrides, RetentionConfig};
