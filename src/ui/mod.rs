pub mod prompt;
pub mod style;
