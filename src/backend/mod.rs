pub mod export;
pub mod formatting;
pub mod grid;
pub mod parser;
pub mod record;
pub mod settings;
