pub mod items_parser;
pub mod items_serializer;

pub use items_parser::{DecodeError, decode_items};
pub use items_serializer::encode_items;
