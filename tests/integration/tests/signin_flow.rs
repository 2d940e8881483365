//! Sign-in flow integration tests.
//!
//! Follows an inbound POST from the browser to the credential that would
//! verify its signature.

use sso_core::SsoConfig;
use sso_integration_tests::{encode_post, init_tracing, messages, TenantFixture};
use sso_saml::bindings::{decode_post_message, HttpPostBinding, SAML_RESPONSE_PARAM};
use sso_saml::{MessageParser, ProtocolMessage, SamlError};

/// Tests the full path from an encoded response to the tenant credential.
#[test]
fn test_post_response_to_tenant_credential() -> anyhow::Result<()> {
    init_tracing();

    let mut fixture = TenantFixture::new();
    let expected = fixture.add_tenant("acme.org", 42);
    let resolver = fixture.resolver().build();

    let xml = messages::response(
        "_resp",
        &messages::signed_assertion("_signed", "alice@acme.org", messages::EXCLUSIVE),
    );
    let post = HttpPostBinding::decode_response(Some(&encode_post(&xml)), Some("/app/home"))?;
    assert_eq!(post.relay_state.as_deref(), Some("/app/home"));

    let parser = MessageParser::with_config(&SsoConfig::default());
    let unmarshalled = parser.unmarshall(&post.xml)?;
    let assertion = unmarshalled
        .message()
        .assertion()
        .expect("response carries an assertion");
    assert!(assertion.signed);
    assert_eq!(assertion.subject_name_id(), Some("alice@acme.org"));

    let credential = resolver.get_credential_for_tenant("acme.org")?;
    assert_eq!(credential.certificate_der(), expected.as_slice());
    Ok(())
}

/// Tests that line-wrapped base64 from the form is accepted.
#[test]
fn test_post_value_with_line_breaks() -> anyhow::Result<()> {
    init_tracing();

    let xml = messages::assertion("_a1", "alice@example.com");
    let encoded = encode_post(&xml);
    let wrapped: String = encoded
        .as_bytes()
        .chunks(76)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n");

    assert_eq!(decode_post_message(&wrapped)?, xml);
    Ok(())
}

/// Tests that a wrapped response never reaches credential resolution.
#[test]
fn test_wrapping_attack_stops_the_flow() -> anyhow::Result<()> {
    init_tracing();

    let body = format!(
        "{}\n{}",
        messages::signed_assertion("_signed", "alice@acme.org", messages::EXCLUSIVE),
        messages::assertion("_evil", "admin@acme.org")
    );
    let xml = decode_post_message(&encode_post(&messages::response("_resp", &body)))?;

    let err = MessageParser::new()
        .unmarshall(&xml)
        .expect_err("wrapping must be rejected");
    assert!(err.is_suspected_attack());
    assert_eq!(err.status_code(), "urn:oasis:names:tc:SAML:2.0:status:Requester");
    Ok(())
}

/// Tests binding errors for missing and corrupt form values.
#[test]
fn test_binding_errors() {
    init_tracing();

    let err = HttpPostBinding::decode_response(None, None).expect_err("missing parameter");
    assert!(matches!(err, SamlError::InvalidBinding(ref m) if m.contains(SAML_RESPONSE_PARAM)));

    let err = decode_post_message("%%%not-base64%%%").expect_err("corrupt value");
    assert!(matches!(err, SamlError::Base64Decode(_)));
}

/// Tests that logout messages travel the same path.
#[test]
fn test_logout_request_through_binding() -> anyhow::Result<()> {
    init_tracing();

    let xml = r#"<samlp:LogoutRequest xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_logout1" Version="2.0" IssueInstant="2024-05-01T12:30:00Z">
  <saml:Issuer>https://idp.example.com</saml:Issuer>
  <saml:NameID>alice@acme.org</saml:NameID>
  <samlp:SessionIndex>_session1</samlp:SessionIndex>
</samlp:LogoutRequest>"#;

    let message = MessageParser::new()
        .unmarshall(&decode_post_message(&encode_post(xml))?)?
        .into_message();
    let ProtocolMessage::LogoutRequest(request) = &message else {
        anyhow::bail!("expected a logout request, got {}", message.kind());
    };
    assert_eq!(request.session_indexes, vec!["_session1".to_string()]);
    assert_eq!(
        request.name_id.as_ref().map(|n| n.value.as_str()),
        Some("alice@acme.org")
    );
    Ok(())
}
