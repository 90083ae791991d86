mod kv;
mod types;

pub use kv::Storage;
pub use types::StorageError;
