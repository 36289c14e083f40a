// ABOUTME: Image acquisition pipeline: fetch, verify, upload, alias.
// ABOUTME: Exports ImageFetcher plus the cleanup guard, keyed locks and digest helper it uses.

mod cleanup;
mod digest;
mod error;
mod fetcher;
mod locks;

pub use cleanup::RemoveOnError;
pub use digest::image_digest;
pub use error::{FetchError, FetchErrorKind, IMAGE_EXISTS_REASON};
pub use fetcher::ImageFetcher;
pub use locks::{ImageLockGuard, ImageLocks};
