//! Unmarshalling integration tests.
//!
//! Drives hostile and well-formed messages through the public parser.

use sso_integration_tests::{init_tracing, messages};
use sso_saml::{
    detect_mode, unmarshall, CanonicalizationMode, LoaderOptions, MessageParser, SamlError,
    ValidationError, XmlLoader,
};

/// Tests that a plain successful response is unmarshalled with its assertion.
#[test]
fn test_unmarshall_valid_response() -> anyhow::Result<()> {
    init_tracing();

    let xml = messages::response("_resp1", &messages::assertion("_a1", "alice@example.com"));
    let unmarshalled = unmarshall(&xml)?;
    let message = unmarshalled.message();

    assert_eq!(message.kind(), "Response");
    assert_eq!(message.id(), Some("_resp1"));
    assert_eq!(message.issuer(), Some("https://idp.example.com"));

    let response = message.as_response().expect("root should be a Response");
    assert!(response.is_success());
    assert_eq!(response.assertions.len(), 1);

    let assertion = message.assertion().expect("response should carry an assertion");
    assert_eq!(assertion.subject_name_id(), Some("alice@example.com"));
    assert!(assertion.is_audience_allowed("https://sp.example.com"));
    Ok(())
}

/// Tests that a bare assertion root is accepted.
#[test]
fn test_unmarshall_bare_assertion() -> anyhow::Result<()> {
    init_tracing();

    let message = unmarshall(&messages::assertion("_a2", "bob@example.com"))?.into_message();
    assert!(message.is_assertion());
    assert_eq!(message.id(), Some("_a2"));
    Ok(())
}

/// Tests that leading whitespace before the XML declaration is tolerated.
#[test]
fn test_unmarshall_trims_input() -> anyhow::Result<()> {
    init_tracing();

    let xml = format!(
        "\n  <?xml version=\"1.0\" encoding=\"UTF-8\"?>{}\n",
        messages::assertion("_a3", "carol@example.com")
    );
    assert_eq!(unmarshall(&xml)?.message().id(), Some("_a3"));
    Ok(())
}

/// Tests that internal entity declarations are refused.
#[test]
fn test_rejects_entity_expansion() {
    init_tracing();

    let xml = r#"<?xml version="1.0"?>
<!DOCTYPE r [<!ENTITY lol "lol"><!ENTITY lol2 "&lol;&lol;&lol;&lol;">]>
<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" ID="&lol2;" Version="2.0" IssueInstant="2024-05-01T12:00:00Z"/>"#;

    let err = unmarshall(xml).expect_err("DTD must be refused");
    assert!(err.is_parse_error(), "expected parse error, got {err:?}");
}

/// Tests that external entities never reach the file system.
#[test]
fn test_rejects_external_entity() {
    init_tracing();

    let xml = r#"<?xml version="1.0"?>
<!DOCTYPE r [<!ENTITY xxe SYSTEM "file:///etc/passwd">]>
<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_a" Version="2.0" IssueInstant="2024-05-01T12:00:00Z">
  <saml:Issuer>&xxe;</saml:Issuer>
</saml:Assertion>"#;

    let err = unmarshall(xml).expect_err("external entity must be refused");
    assert!(matches!(err, SamlError::XmlParse(_)), "got {err:?}");
}

/// Tests that malformed and empty input surface as parse errors.
#[test]
fn test_rejects_malformed_input() {
    init_tracing();

    for xml in ["", "   ", "<samlp:Response", "not xml at all"] {
        let err = unmarshall(xml).expect_err("malformed input must fail");
        assert!(err.is_parse_error(), "{xml:?} gave {err:?}");
    }
}

/// Tests that an unknown root element is a validation error.
#[test]
fn test_rejects_unknown_root() {
    init_tracing();

    let err = unmarshall(r#"<foo:Bar xmlns:foo="urn:example"/>"#).expect_err("unknown root");
    assert!(err.is_validation_error());
    assert!(!err.is_suspected_attack());
}

/// Tests that two assertions in one response are rejected as wrapping.
#[test]
fn test_rejects_duplicate_assertions() {
    init_tracing();

    let body = format!(
        "{}\n{}",
        messages::assertion("_a1", "alice@example.com"),
        messages::assertion("_evil", "admin@example.com")
    );
    let err = unmarshall(&messages::response("_resp", &body)).expect_err("wrapping");

    assert!(err.is_suspected_attack());
    assert!(matches!(
        err,
        SamlError::Validation(ValidationError::DuplicateAssertion { count: 2 })
    ));
}

/// Tests that an assertion hidden in extensions still counts.
#[test]
fn test_rejects_assertion_smuggled_in_extensions() {
    init_tracing();

    let body = format!(
        "<samlp:Extensions>{}</samlp:Extensions>\n{}",
        messages::assertion("_evil", "admin@example.com"),
        messages::signed_assertion("_a1", "alice@example.com", messages::EXCLUSIVE)
    );
    let err = unmarshall(&messages::response("_resp", &body)).expect_err("wrapping");
    assert!(matches!(
        err,
        SamlError::Validation(ValidationError::DuplicateAssertion { count: 2 })
    ));
}

/// Tests that a response embedded in a response is rejected.
#[test]
fn test_rejects_embedded_response() {
    init_tracing();

    let inner = messages::response("_inner", &messages::assertion("_a1", "alice@example.com"));
    let outer = messages::response("_outer", &format!("<samlp:Extensions>{inner}</samlp:Extensions>"));

    let err = unmarshall(&outer).expect_err("embedded response");
    assert!(matches!(
        err,
        SamlError::Validation(ValidationError::DuplicateResponse { count: 1 })
    ));
}

/// Tests that an assertion nested inside an assertion root is rejected.
#[test]
fn test_rejects_nested_assertion() {
    init_tracing();

    let nested = messages::assertion("_evil", "admin@example.com");
    let outer = messages::assertion("_a1", "alice@example.com").replace(
        "<saml:Issuer>https://idp.example.com</saml:Issuer>",
        &format!("<saml:Issuer>https://idp.example.com</saml:Issuer><saml:Advice>{nested}</saml:Advice>"),
    );

    let err = unmarshall(&outer).expect_err("nested assertion");
    assert!(err.is_suspected_attack());
    assert!(matches!(
        err,
        SamlError::Validation(ValidationError::NestedAssertion { count: 1 })
    ));
}

/// Tests that look-alike elements from other namespaces are ignored.
#[test]
fn test_ignores_foreign_namespace_lookalikes() -> anyhow::Result<()> {
    init_tracing();

    let body = format!(
        r#"<samlp:Extensions><x:Assertion xmlns:x="urn:example:ext"/><x:Response xmlns:x="urn:example:ext"/></samlp:Extensions>
{}"#,
        messages::assertion("_a1", "alice@example.com")
    );
    let message = unmarshall(&messages::response("_resp", &body))?.into_message();
    assert_eq!(message.assertion().and_then(|a| a.id.as_deref()), Some("_a1"));
    Ok(())
}

/// Tests that a signature over comments switches the parser to keep them.
#[test]
fn test_with_comments_signature_keeps_comments() -> anyhow::Result<()> {
    init_tracing();

    let assertion = messages::signed_assertion(
        "_signed",
        "user@example.com<!---->.evil.com",
        messages::WITH_COMMENTS,
    );
    let xml = messages::response("_resp", &assertion);

    let loader = XmlLoader::new();
    let stripped = loader.parse(&xml, false)?;
    assert_eq!(detect_mode(&stripped), CanonicalizationMode::WithComments);
    assert!(!stripped.elements().any(|e| e.has_comments()));

    let preserved = loader.parse(&xml, true)?;
    assert!(preserved.comments_preserved());
    assert!(preserved.elements_by_local_name("NameID").any(|e| e.has_comments()));

    let unmarshalled = unmarshall(&xml)?;
    assert_eq!(unmarshalled.canonicalization(), CanonicalizationMode::WithComments);
    assert!(unmarshalled.document().comments_preserved());
    assert!(unmarshalled
        .document()
        .elements_by_local_name("NameID")
        .any(|e| e.has_comments()));

    let assertion = unmarshalled.message().assertion().expect("assertion");
    assert!(assertion.signed);
    assert_eq!(assertion.subject_name_id(), Some("user@example.com.evil.com"));
    Ok(())
}

/// Tests that an exclusive transform leaves the default mode in place.
#[test]
fn test_exclusive_signature_uses_default_mode() -> anyhow::Result<()> {
    init_tracing();

    let xml = messages::response(
        "_resp",
        &messages::signed_assertion("_signed", "alice@example.com", messages::EXCLUSIVE),
    );
    let doc = XmlLoader::new().parse(&xml, false)?;
    assert_eq!(detect_mode(&doc), CanonicalizationMode::Exclusive);

    let unmarshalled = unmarshall(&xml)?;
    assert_eq!(unmarshalled.canonicalization(), CanonicalizationMode::Exclusive);
    assert!(!unmarshalled.document().comments_preserved());
    assert_eq!(unmarshalled.document(), &doc);
    Ok(())
}

/// Tests that a response without header attributes or status is unmarshalled.
#[test]
fn test_unmarshall_minimal_response() -> anyhow::Result<()> {
    init_tracing();

    let xml = r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"/>"#;
    let message = unmarshall(xml)?.into_message();
    let response = message.as_response().expect("root should be a Response");
    assert_eq!(response.id, None);
    assert_eq!(response.issue_instant, None);
    assert_eq!(response.status, None);
    assert!(!response.is_success());
    Ok(())
}

/// Tests that an empty assertion inside a response is unmarshalled.
#[test]
fn test_unmarshall_minimal_assertion_child() -> anyhow::Result<()> {
    init_tracing();

    let xml = r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion"><saml:Assertion/></samlp:Response>"#;
    let message = unmarshall(xml)?.into_message();
    let assertion = message.assertion().expect("response should carry an assertion");
    assert_eq!(assertion.id, None);
    assert_eq!(assertion.issuer, None);
    assert_eq!(message.id(), None);
    Ok(())
}

/// Tests that a timestamp which is present but unreadable is still rejected.
#[test]
fn test_rejects_unreadable_timestamp() {
    init_tracing();

    let xml = r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" IssueInstant="yesterday"/>"#;
    let err = unmarshall(xml).expect_err("timestamp must parse");
    assert!(matches!(
        err,
        SamlError::Validation(ValidationError::Unmarshalling(_))
    ));
}

/// Tests that loader limits from the parser options are enforced.
#[test]
fn test_parser_enforces_size_limit() {
    init_tracing();

    let parser = MessageParser::with_options(LoaderOptions {
        max_message_bytes: 256,
        ..LoaderOptions::default()
    });
    let xml = messages::response("_resp", &messages::assertion("_a1", "alice@example.com"));

    let err = parser.unmarshall(&xml).expect_err("message exceeds limit");
    assert!(err.is_parse_error());
}
