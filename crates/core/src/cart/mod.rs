pub mod storage;
pub mod store;

pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CartError, CartStore, CartUpdate, StorageNotice, load_cart};
