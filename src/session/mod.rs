//! Upload session storage and expiry
//!
//! An `UploadSession` buffers the chunks of one audio upload, keyed by
//! a client-chosen id. The `SessionStore` owns every live session;
//! `spawn_expiry_sweeper` reclaims the ones abandoned mid-upload.

mod store;
mod sweeper;

pub use store::{SessionStore, UploadSession};
pub use sweeper::spawn_expiry_sweeper;
