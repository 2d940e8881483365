//! Shared fixtures for the end-to-end tests.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use parking_lot::Mutex;
use sso_core::SUPER_TENANT_ID;
use sso_credential::{
    CredentialResolver, CredentialResolverBuilder, InMemoryKeyStore, InMemoryKeyStoreManager,
    InMemoryKeyStoreRepository, StaticTenantDirectory,
};
use sso_spi::{AuthenticationObserver, SpiResult, TenantRegistryLoader};

/// Alias of the IdP certificate in the super tenant's primary keystore.
pub const IDP_ALIAS: &str = "idp";

/// Alias of the designated default certificate in the primary keystore.
pub const DEFAULT_ALIAS: &str = "wso2carbon";

/// Installs a test subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sso_saml=debug,sso_credential=debug")
        .with_test_writer()
        .try_init();
}

/// Generates a throwaway self-signed certificate in DER form.
#[must_use]
pub fn generate_certificate(name: &str) -> Vec<u8> {
    match rcgen::generate_simple_self_signed(vec![name.to_string()]) {
        Ok(certified) => certified.cert.der().to_vec(),
        Err(e) => panic!("certificate generation failed: {e}"),
    }
}

/// Base64-encodes a message the way the HTTP-POST binding carries it.
#[must_use]
pub fn encode_post(xml: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(xml)
}

/// Tenants, keystores and certificates for resolver tests.
pub struct TenantFixture {
    /// Tenant directory.
    pub directory: Arc<StaticTenantDirectory>,
    /// Keystore managers by tenant.
    pub repository: Arc<InMemoryKeyStoreRepository>,
    certificates: HashMap<String, Vec<u8>>,
}

impl Default for TenantFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantFixture {
    /// Creates a fixture with only the super tenant's primary keystore.
    #[must_use]
    pub fn new() -> Self {
        let idp = generate_certificate("idp.carbon.super");
        let default = generate_certificate("carbon.super");

        let repository = InMemoryKeyStoreRepository::new().with_manager(
            SUPER_TENANT_ID,
            InMemoryKeyStoreManager::new().with_primary(
                InMemoryKeyStore::new("wso2carbon.jks")
                    .with_certificate(IDP_ALIAS, idp.clone())
                    .with_certificate(DEFAULT_ALIAS, default.clone())
                    .with_default_alias(DEFAULT_ALIAS),
            ),
        );

        let mut certificates = HashMap::new();
        certificates.insert(IDP_ALIAS.to_string(), idp);
        certificates.insert(DEFAULT_ALIAS.to_string(), default);

        Self {
            directory: Arc::new(StaticTenantDirectory::new()),
            repository: Arc::new(repository),
            certificates,
        }
    }

    /// Registers a tenant with its own keystore and returns its certificate.
    pub fn add_tenant(&mut self, domain: &str, tenant_id: i32) -> Vec<u8> {
        let certificate = generate_certificate(domain);
        let key_store = InMemoryKeyStore::new(sso_credential::key_store_name_for_domain(domain))
            .with_certificate(domain, certificate.clone());

        self.directory.insert(domain, tenant_id);
        self.repository.insert(
            tenant_id,
            Arc::new(InMemoryKeyStoreManager::new().with_key_store(key_store)),
        );
        self.certificates
            .insert(domain.to_string(), certificate.clone());
        certificate
    }

    /// Returns the certificate stored under `alias` or tenant domain.
    #[must_use]
    pub fn certificate(&self, alias: &str) -> Option<&[u8]> {
        self.certificates.get(alias).map(Vec::as_slice)
    }

    /// Starts a resolver over this fixture with a no-op registry loader.
    #[must_use]
    pub fn resolver(&self) -> CredentialResolverBuilder {
        CredentialResolver::builder(self.directory.clone(), self.repository.clone())
            .tenant_registry_loader(Arc::new(RecordingLoader::default()))
    }
}

/// Registry loader that records the tenants it loaded.
#[derive(Debug, Default)]
pub struct RecordingLoader {
    /// Loaded tenant ids, in call order.
    pub loaded: Mutex<Vec<i32>>,
}

impl TenantRegistryLoader for RecordingLoader {
    fn load_tenant_registry(&self, tenant_id: i32) -> SpiResult<()> {
        self.loaded.lock().push(tenant_id);
        Ok(())
    }
}

/// Observer that records the tenants it was notified about.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Notified tenant ids, in call order.
    pub started: Mutex<Vec<i32>>,
}

impl AuthenticationObserver for RecordingObserver {
    fn started_authentication(&self, tenant_id: i32) {
        self.started.lock().push(tenant_id);
    }
}

/// SAML message templates.
pub mod messages {
    /// Exclusive canonicalization with comments.
    pub const WITH_COMMENTS: &str = "http://www.w3.org/2001/10/xml-exc-c14n#WithComments";

    /// Exclusive canonicalization.
    pub const EXCLUSIVE: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

    /// An unsigned assertion.
    #[must_use]
    pub fn assertion(id: &str, name_id: &str) -> String {
        format!(
            r#"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="{id}" Version="2.0" IssueInstant="2024-05-01T12:00:00Z">
    <saml:Issuer>https://idp.example.com</saml:Issuer>
    <saml:Subject>
      <saml:NameID Format="urn:oasis:names:tc:SAML:1.1:nameid-format:emailAddress">{name_id}</saml:NameID>
      <saml:SubjectConfirmation Method="urn:oasis:names:tc:SAML:2.0:cm:bearer">
        <saml:SubjectConfirmationData InResponseTo="_req1" NotOnOrAfter="2024-05-01T12:05:00Z" Recipient="https://sp.example.com/acs"/>
      </saml:SubjectConfirmation>
    </saml:Subject>
    <saml:Conditions NotBefore="2024-05-01T11:59:00Z" NotOnOrAfter="2024-05-01T12:05:00Z">
      <saml:AudienceRestriction><saml:Audience>https://sp.example.com</saml:Audience></saml:AudienceRestriction>
    </saml:Conditions>
    <saml:AuthnStatement AuthnInstant="2024-05-01T12:00:00Z" SessionIndex="_session1"/>
  </saml:Assertion>"#
        )
    }

    /// An assertion whose signature references it with the given transform.
    #[must_use]
    pub fn signed_assertion(id: &str, name_id: &str, transform: &str) -> String {
        format!(
            r##"<saml:Assertion xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="{id}" Version="2.0" IssueInstant="2024-05-01T12:00:00Z">
    <saml:Issuer>https://idp.example.com</saml:Issuer>
    <ds:Signature xmlns:ds="http://www.w3.org/2000/09/xmldsig#">
      <ds:SignedInfo>
        <ds:CanonicalizationMethod Algorithm="http://www.w3.org/2001/10/xml-exc-c14n#"/>
        <ds:SignatureMethod Algorithm="http://www.w3.org/2001/04/xmldsig-more#rsa-sha256"/>
        <ds:Reference URI="#{id}">
          <ds:Transforms>
            <ds:Transform Algorithm="http://www.w3.org/2000/09/xmldsig#enveloped-signature"/>
            <ds:Transform Algorithm="{transform}"/>
          </ds:Transforms>
          <ds:DigestMethod Algorithm="http://www.w3.org/2001/04/xmlenc#sha256"/>
          <ds:DigestValue>AAAA</ds:DigestValue>
        </ds:Reference>
      </ds:SignedInfo>
      <ds:SignatureValue>AAAA</ds:SignatureValue>
    </ds:Signature>
    <saml:Subject>
      <saml:NameID>{name_id}</saml:NameID>
    </saml:Subject>
  </saml:Assertion>"##
        )
    }

    /// A successful response wrapping `body`.
    #[must_use]
    pub fn response(id: &str, body: &str) -> String {
        format!(
            r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="{id}" Version="2.0" IssueInstant="2024-05-01T12:00:00Z" InResponseTo="_req1" Destination="https://sp.example.com/acs">
  <saml:Issuer>https://idp.example.com</saml:Issuer>
  <samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status>
  {body}
</samlp:Response>"#
        )
    }
}
