pub mod config;
pub mod drop;
pub mod input;
pub mod session;
pub mod store;
pub mod tools;

pub use config::EditorConfig;
pub use session::{CanvasSession, EditorError, Mutation};
pub use store::{FileStore, MemoryStore, Store, StoreError};
