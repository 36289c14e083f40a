// ABOUTME: Integration tests for domain types.
// ABOUTME: Identifier conversions, metadata serde and context redaction.

use lxd_image::types::{
    Fingerprint, ImageMetadata, ImageName, ImageReference, ImageReferenceError, Instance,
    OperationId, RequestContext,
};

#[test]
fn fingerprint_serializes_as_plain_string() {
    let fp = Fingerprint::new("ba7816bf".to_string());
    assert_eq!(serde_json::to_string(&fp).unwrap(), r#""ba7816bf""#);

    let back: Fingerprint = serde_json::from_str(r#""ba7816bf""#).unwrap();
    assert_eq!(back, fp);
}

#[test]
fn operation_id_displays_value() {
    let id = OperationId::new("op-1".to_string());
    assert_eq!(id.to_string(), "op-1");
    assert_eq!(id.into_inner(), "op-1");
}

#[test]
fn metadata_deserializes_with_validation() {
    let image: ImageMetadata =
        serde_json::from_str(r#"{"name":"cirros","reference":"ref-123"}"#).unwrap();
    assert_eq!(image.name.as_str(), "cirros");
    assert_eq!(image.reference.as_str(), "ref-123");

    assert!(
        serde_json::from_str::<ImageMetadata>(r#"{"name":"cirros","reference":"../etc"}"#)
            .is_err()
    );
    assert!(serde_json::from_str::<ImageMetadata>(r#"{"name":"","reference":"r"}"#).is_err());
}

#[test]
fn reference_rejects_path_tricks() {
    assert!(matches!(
        ImageReference::parse(".."),
        Err(ImageReferenceError::LeadingDot)
    ));
    assert!(matches!(
        ImageReference::parse("a/b"),
        Err(ImageReferenceError::InvalidChar('/'))
    ));
    assert!(ImageReference::parse("9f8e7d6c-1234-4abc-8def-0123456789ab").is_ok());
}

#[test]
fn name_allows_dots_and_colons() {
    assert!(ImageName::new("ubuntu:22.04").is_ok());
    assert!(ImageName::new("cirros 0.6").is_err());
}

#[test]
fn request_context_debug_hides_token() {
    let ctx = RequestContext::new("req-1").with_auth_token("s3cret");
    let debug = format!("{:?}", ctx);
    assert!(debug.contains("req-1"));
    assert!(!debug.contains("s3cret"));
}

#[test]
fn instance_keeps_uuid() {
    let instance = Instance::new("uuid-1");
    assert_eq!(instance.uuid, "uuid-1");
}
