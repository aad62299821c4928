pub mod client;
pub mod models;
pub mod signer;

pub use client::{ObjectFetcher, StorageClient};
pub use models::{SignedUrl, StorageError};
pub use signer::{GuestUrlSigner, UrlSigner};
