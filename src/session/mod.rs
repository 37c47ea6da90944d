mod store;

pub use store::{KeyringBackend, MemoryBackend, SessionBackend, SessionStore};
pub use store::{KEY_REFRESH_TOKEN, KEY_TOKEN, KEY_USER};
