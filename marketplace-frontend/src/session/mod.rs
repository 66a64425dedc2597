pub mod owner;
pub mod storage;
pub mod store;

pub use owner::SessionOwner;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, IDENTITY_KEY, TOKEN_KEY};
pub use store::{ActiveSession, BearerToken, Session, SessionStore, Teardown};
