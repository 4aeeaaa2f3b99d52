//! File system storage operations
//!
//! This module handles every file the migration jobs hand to each other:
//! - Indented JSON arrays and maps
//! - DynamoDB value-tagged table exports
//! - The fixed layout of the dump directory

mod dump_paths;
mod dynamo_json;
mod json_file;

pub use dump_paths::DumpPaths;
pub use dynamo_json::{
    DynamoExportReader, DynamoExportWriter, DynamoJsonDecoder, DynamoJsonError, decode_item,
    decode_value, encode_item, encode_value, parse_number,
};
pub use json_file::{JsonArrayReader, JsonArrayWriter, read_json, write_json};
