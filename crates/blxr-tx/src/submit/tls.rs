//! TLS client configuration for `wss` endpoints.

use std::sync::Arc;

use rustls::{
    ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme,
    client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier},
    crypto::{CryptoProvider, ring, verify_tls12_signature, verify_tls13_signature},
    pki_types::{CertificateDer, ServerName, UnixTime},
};

use super::TransportError;
use crate::config::TlsVerification;

/// Builds the rustls client configuration for one verification policy.
pub(super) fn client_config(
    verification: TlsVerification,
) -> Result<Arc<ClientConfig>, TransportError> {
    let provider = Arc::new(ring::default_provider());
    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()
        .map_err(|error| TransportError::Config {
            message: format!("tls protocol setup failed: {error}"),
        })?;

    let config = match verification {
        TlsVerification::Verified => {
            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            builder.with_root_certificates(roots).with_no_client_auth()
        }
        TlsVerification::Disabled => builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
            .with_no_client_auth(),
    };
    Ok(Arc::new(config))
}

/// Verifier that trusts every server certificate but still checks handshake signatures.
#[derive(Debug)]
struct AcceptAnyServerCert {
    /// Provider supplying signature verification algorithms.
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_policies_build() {
        assert!(client_config(TlsVerification::Verified).is_ok());
        assert!(client_config(TlsVerification::Disabled).is_ok());
    }

    #[test]
    fn disabled_policy_accepts_unknown_certificate() {
        let verifier = AcceptAnyServerCert {
            provider: Arc::new(ring::default_provider()),
        };
        let server_name = ServerName::try_from("api.blxrbdn.com");
        assert!(server_name.is_ok());
        if let Ok(server_name) = server_name {
            let verdict = verifier.verify_server_cert(
                &CertificateDer::from(vec![0_u8; 4]),
                &[],
                &server_name,
                &[],
                UnixTime::now(),
            );
            assert!(verdict.is_ok());
        }
        assert!(!verifier.supported_verify_schemes().is_empty());
    }
}
