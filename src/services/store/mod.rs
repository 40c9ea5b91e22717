pub mod memory;
pub mod types;

pub use memory::InMemoryStore;
pub use types::{ResponseStore, StoreError, StoredResponse};
