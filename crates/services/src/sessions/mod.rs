mod store;

pub use store::{SessionGuard, SessionStore};
