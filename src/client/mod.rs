//! Client-side state of the catalog and admin frontends: the shopping cart
//! reducer, the admin session marker, and the key/value "local storage" both
//! persist through.

pub mod cart;
pub mod session;
pub mod storage;

pub use cart::{CartAction, CartItem, CartState, CartStore};
pub use session::AdminSession;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
