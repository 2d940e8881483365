//! X.509 signing credentials.

use chrono::{DateTime, Utc};
use sso_core::TenantKey;
use x509_parser::pem::parse_x509_pem;

use crate::error::{CredentialError, CredentialResult};

/// An immutable public credential bound to one tenant.
///
/// Wraps exactly one X.509 certificate. The certificate is parsed once at
/// construction. Credentials are built fresh for every resolution and are
/// never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    tenant: TenantKey,
    der: Vec<u8>,
    public_key: Vec<u8>,
    subject: String,
    issuer: String,
    serial: String,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential from a DER-encoded certificate.
    ///
    /// ## Errors
    ///
    /// Returns [`CredentialError::InvalidCertificate`] if the bytes are not a
    /// single well-formed X.509 certificate.
    pub fn new(tenant: TenantKey, der: Vec<u8>) -> CredentialResult<Self> {
        let (public_key, subject, issuer, serial, not_before, not_after) = {
            let (rest, cert) = x509_parser::parse_x509_certificate(&der)
                .map_err(|e| CredentialError::InvalidCertificate(e.to_string()))?;
            if !rest.is_empty() {
                return Err(CredentialError::InvalidCertificate(format!(
                    "{} trailing bytes after certificate",
                    rest.len()
                )));
            }
            let validity = cert.validity();
            (
                cert.public_key().raw.to_vec(),
                cert.subject().to_string(),
                cert.issuer().to_string(),
                cert.raw_serial_as_string(),
                timestamp(validity.not_before.timestamp())?,
                timestamp(validity.not_after.timestamp())?,
            )
        };

        Ok(Self {
            tenant,
            der,
            public_key,
            subject,
            issuer,
            serial,
            not_before,
            not_after,
        })
    }

    /// Creates a credential from a PEM-encoded certificate.
    ///
    /// ## Errors
    ///
    /// Returns [`CredentialError::InvalidCertificate`] if the PEM block is
    /// malformed or does not hold a certificate.
    pub fn from_pem(tenant: TenantKey, pem: &[u8]) -> CredentialResult<Self> {
        let (_, block) =
            parse_x509_pem(pem).map_err(|e| CredentialError::InvalidCertificate(e.to_string()))?;
        if block.label != "CERTIFICATE" {
            return Err(CredentialError::InvalidCertificate(format!(
                "unexpected PEM label {}",
                block.label
            )));
        }
        Self::new(tenant, block.contents)
    }

    /// Returns the tenant this credential is bound to.
    #[must_use]
    pub const fn tenant(&self) -> &TenantKey {
        &self.tenant
    }

    /// Returns the DER-encoded certificate.
    #[must_use]
    pub fn certificate_der(&self) -> &[u8] {
        &self.der
    }

    /// Returns the DER-encoded SubjectPublicKeyInfo.
    #[must_use]
    pub fn public_key_der(&self) -> &[u8] {
        &self.public_key
    }

    /// Returns the subject distinguished name.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the issuer distinguished name.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the serial number as colon-separated hex.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Returns the start of the validity period.
    #[must_use]
    pub const fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// Returns the end of the validity period.
    #[must_use]
    pub const fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Returns true if `now` lies within the validity period.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now <= self.not_after
    }
}

fn timestamp(secs: i64) -> CredentialResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        CredentialError::InvalidCertificate(format!("validity time {secs} out of range"))
    })
}
