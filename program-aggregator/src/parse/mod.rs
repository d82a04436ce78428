pub mod records;
pub mod resolve;

pub use records::{decode_records, Record};
pub use resolve::{lookup, lookup_id, lookup_number, lookup_str, resolve, resolve_number};
