// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Image names, image references, caller-supplied metadata and request context.

mod id;
mod image_name;
mod image_reference;
mod metadata;

pub use id::{Fingerprint, OperationId};
pub use image_name::{ImageName, ImageNameError};
pub use image_reference::{ImageReference, ImageReferenceError};
pub use metadata::{ImageMetadata, Instance, RequestContext};
