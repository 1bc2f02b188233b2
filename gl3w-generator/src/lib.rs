mod generate;
mod parse;
mod record;

pub use generate::{generate_header, generate_source};
pub use parse::{EXTENSION_SUFFIXES, Extractor, extract, is_extension};
pub use record::FunctionRecord;
