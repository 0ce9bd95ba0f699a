mod common;

use common::fingerprint_for;
use gestion_license::{
    DEFAULT_MASTER_SECRET, DEFAULT_PRODUCT_NAME, HardwareFingerprint, LicenseCode, LicenseError,
    LicensePayload, ObfuscationCodec, PAYLOAD_VERSION, format_code, unformat_code,
};
use proptest::prelude::*;

fn codec() -> ObfuscationCodec {
    ObfuscationCodec::new(DEFAULT_MASTER_SECRET)
}

// ── Formatter ────────────────────────────────────────────────────

#[test]
fn format_groups_first_twenty_characters() {
    assert_eq!(
        format_code("ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        "ABCDE-FGHIJ-KLMNO-PQRST"
    );
}

#[test]
fn format_strips_padding_and_unsafe_characters() {
    assert_eq!(format_code("ab+cd/ef==gh"), "abcde-fgh");
}

#[test]
fn format_short_input_yields_fewer_blocks() {
    assert_eq!(format_code("ABCDEFG"), "ABCDE-FG");
    assert_eq!(format_code("ABC"), "ABC");
    assert_eq!(format_code(""), "");
    assert_eq!(format_code("==="), "");
}

#[test]
fn unformat_strips_dashes() {
    assert_eq!(unformat_code("ABCDE-FGHIJ-KLMNO-PQRST"), "ABCDEFGHIJKLMNOPQRST");
    assert_eq!(unformat_code(" ABCDE - FGHIJ "), "ABCDEFGHIJ");
}

// ── LicenseCode ──────────────────────────────────────────────────

#[test]
fn issued_code_has_four_blocks() {
    let code = LicenseCode::issue(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, &codec());
    let blocks: Vec<&str> = code.as_str().split('-').collect();
    assert_eq!(blocks.len(), 4);
    assert!(blocks.iter().all(|b| b.len() == 5));
}

#[test]
fn issued_code_is_deterministic() {
    let a = LicenseCode::issue(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, &codec());
    let b = LicenseCode::issue(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, &codec());
    assert_eq!(a, b);
}

#[test]
fn issued_code_verifies_for_its_machine() {
    let hwid = fingerprint_for("a");
    let code = LicenseCode::issue(&hwid, DEFAULT_PRODUCT_NAME, &codec());
    assert!(code.verify(&hwid, DEFAULT_PRODUCT_NAME, &codec()).is_ok());
}

#[test]
fn issued_code_rejected_on_other_machine() {
    let code = LicenseCode::issue(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, &codec());
    let err = code
        .verify(&fingerprint_for("b"), DEFAULT_PRODUCT_NAME, &codec())
        .unwrap_err();
    assert!(matches!(err, LicenseError::FingerprintMismatch));
}

#[test]
fn issued_code_rejected_for_other_product() {
    let hwid = fingerprint_for("a");
    let code = LicenseCode::issue(&hwid, DEFAULT_PRODUCT_NAME, &codec());
    assert!(code.verify(&hwid, "OtroProducto", &codec()).is_err());
}

#[test]
fn issued_code_rejected_under_other_secret() {
    let hwid = fingerprint_for("a");
    let code = LicenseCode::issue(&hwid, DEFAULT_PRODUCT_NAME, &codec());
    let other = ObfuscationCodec::new(b"another secret");
    assert!(code.verify(&hwid, DEFAULT_PRODUCT_NAME, &other).is_err());
}

#[test]
fn verify_ignores_missing_dashes() {
    let hwid = fingerprint_for("a");
    let code = LicenseCode::issue(&hwid, DEFAULT_PRODUCT_NAME, &codec());
    let typed = LicenseCode::parse(&unformat_code(code.as_str())).unwrap();
    assert!(typed.verify(&hwid, DEFAULT_PRODUCT_NAME, &codec()).is_ok());
}

#[test]
fn parse_rejects_empty_and_short() {
    for input in ["", "   ", "123", "-----", "ABCDE-FGHI"] {
        let err = LicenseCode::parse(input).unwrap_err();
        assert!(
            matches!(err, LicenseError::InvalidCodeFormat(_)),
            "{input:?} should be rejected"
        );
    }
}

#[test]
fn parse_accepts_ten_characters() {
    let code = LicenseCode::parse(" ABCDE-FGHIJ ").unwrap();
    assert_eq!(code.as_str(), "ABCDE-FGHIJ");
}

// ── LicensePayload ───────────────────────────────────────────────

#[test]
fn payload_seal_open_roundtrip() {
    let payload = LicensePayload::new(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, 365);
    let sealed = payload.seal(&codec()).unwrap();
    let opened = LicensePayload::open(&sealed, &codec()).unwrap();
    assert_eq!(opened, payload);
    assert_eq!(opened.version, PAYLOAD_VERSION);
}

#[test]
fn payload_expiry() {
    let payload = LicensePayload::new(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, 30);
    assert!(!payload.is_expired_at(payload.issued_date));
    assert!(payload.is_expired_at(payload.issued_date + chrono::Duration::days(30)));
    assert_eq!(
        payload.expires_at(),
        Some(payload.issued_date + chrono::Duration::days(30))
    );
}

#[test]
fn payload_beyond_calendar_never_expires() {
    let payload = LicensePayload::new(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, u32::MAX);
    assert_eq!(payload.expires_at(), None);
    assert!(!payload.is_expired_at(chrono::NaiveDateTime::MAX));
}

#[test]
fn perpetual_payload_expires_in_a_century() {
    let payload = LicensePayload::new(&fingerprint_for("a"), DEFAULT_PRODUCT_NAME, 36_500);
    let end = payload.expires_at().unwrap();
    assert!(!payload.is_expired_at(end - chrono::Duration::days(1)));
}

#[test]
fn payload_json_field_names() {
    let payload = LicensePayload::new(&fingerprint_for("a"), "GestionComercial", 36_500);
    let value = serde_json::to_value(&payload).unwrap();
    for field in ["hwid", "product", "issued_date", "validity_days", "version"] {
        assert!(value.get(field).is_some(), "missing {field}");
    }
}

// ── Properties ───────────────────────────────────────────────────

fn fingerprint_strategy() -> impl Strategy<Value = HardwareFingerprint> {
    "[0-9A-F]{32}".prop_map(|s| HardwareFingerprint::parse(&s).unwrap())
}

proptest! {
    /// Formatting any obfuscated payload yields four dash-separated blocks, 23 chars at most.
    #[test]
    fn formatted_payload_shape(hwid in fingerprint_strategy()) {
        let payload = LicensePayload::new(&hwid, DEFAULT_PRODUCT_NAME, 36_500);
        let raw = payload.seal(&codec()).unwrap();
        let code = format_code(&raw);

        prop_assert!(code.len() <= 23);
        prop_assert_eq!(code.split('-').count(), 4);
        prop_assert!(!code.contains(['=', '+', '/']));
    }

    /// A code only verifies for the fingerprint it was issued for.
    #[test]
    fn code_binds_to_fingerprint(a in fingerprint_strategy(), b in fingerprint_strategy()) {
        prop_assume!(a != b);
        let code = LicenseCode::issue(&a, DEFAULT_PRODUCT_NAME, &codec());
        prop_assert!(code.verify(&a, DEFAULT_PRODUCT_NAME, &codec()).is_ok());
        prop_assert!(code.verify(&b, DEFAULT_PRODUCT_NAME, &codec()).is_err());
    }

    /// The formatter never panics and never emits more than 20 payload characters.
    #[test]
    fn format_any_input(raw in ".{0,80}") {
        let code = format_code(&raw);
        prop_assert!(unformat_code(&code).chars().count() <= 20);
    }
}
