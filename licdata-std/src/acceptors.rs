//! Standard acceptors, one per inbound event kind.
//!
//! Each acceptor declines (`Ok(None)`) any signal of another kind, so a
//! misconfigured route never translates the wrong payload.

use crate::translate::{
    MissingOptionPolicy, translate_image_push_requested, translate_image_requested,
};
use licdata_core::{Acceptor, DomainEvent, InboundSignal, TranslationError};

/// Accepts build requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRequestedAcceptor {
    policy: MissingOptionPolicy,
}

impl ImageRequestedAcceptor {
    /// Create an acceptor applying `policy` to missing options.
    pub const fn new(policy: MissingOptionPolicy) -> Self {
        Self { policy }
    }
}

impl Acceptor for ImageRequestedAcceptor {
    fn accept(&self, signal: &InboundSignal) -> Result<Option<DomainEvent>, TranslationError> {
        match signal {
            InboundSignal::DockerImageRequested(options) => {
                translate_image_requested(options, self.policy).map(|e| Some(e.into()))
            }
            _ => Ok(None),
        }
    }
}

/// Accepts push requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImagePushRequestedAcceptor {
    policy: MissingOptionPolicy,
}

impl ImagePushRequestedAcceptor {
    /// Create an acceptor applying `policy` to missing options.
    pub const fn new(policy: MissingOptionPolicy) -> Self {
        Self { policy }
    }
}

impl Acceptor for ImagePushRequestedAcceptor {
    fn accept(&self, signal: &InboundSignal) -> Result<Option<DomainEvent>, TranslationError> {
        match signal {
            InboundSignal::DockerImagePushRequested(options) => {
                translate_image_push_requested(options, self.policy).map(|e| Some(e.into()))
            }
            _ => Ok(None),
        }
    }
}

/// Passes credentials through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialProvidedAcceptor;

impl Acceptor for CredentialProvidedAcceptor {
    fn accept(&self, signal: &InboundSignal) -> Result<Option<DomainEvent>, TranslationError> {
        match signal {
            InboundSignal::CredentialProvided(credential) => Ok(Some(credential.clone().into())),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licdata_core::{CredentialProvided, EventKind, Metadata, RequestOptions};

    fn options() -> RequestOptions {
        RequestOptions::new()
            .with("variant", "slim")
            .with("python_version", "3.12")
            .with("image_version", "1.0")
            .with("docker_registry_url", "registry.example.com")
    }

    #[test]
    fn test_acceptors_build_their_own_kind() {
        let build = ImageRequestedAcceptor::default()
            .accept(&InboundSignal::DockerImageRequested(options()))
            .unwrap()
            .unwrap();
        assert_eq!(build.kind(), EventKind::DockerImageRequested);

        let push = ImagePushRequestedAcceptor::default()
            .accept(&InboundSignal::DockerImagePushRequested(options()))
            .unwrap()
            .unwrap();
        assert_eq!(push.kind(), EventKind::DockerImagePushRequested);
    }

    #[test]
    fn test_acceptors_decline_other_kinds() {
        let signal = InboundSignal::DockerImagePushRequested(options());
        assert_eq!(ImageRequestedAcceptor::default().accept(&signal), Ok(None));
        assert_eq!(CredentialProvidedAcceptor.accept(&signal), Ok(None));
    }

    #[test]
    fn test_credential_passes_through() {
        let credential = CredentialProvided {
            name: "registry.example.com".into(),
            value: "token".into(),
            metadata: Metadata::empty(),
        };
        let event = CredentialProvidedAcceptor
            .accept(&InboundSignal::CredentialProvided(credential.clone()))
            .unwrap();
        assert_eq!(event, Some(DomainEvent::CredentialProvided(credential)));
    }

    #[test]
    fn test_policy_reaches_translation() {
        let signal = InboundSignal::DockerImageRequested(RequestOptions::new());
        assert!(ImageRequestedAcceptor::new(MissingOptionPolicy::Reject)
            .accept(&signal)
            .is_err());
        assert!(ImageRequestedAcceptor::new(MissingOptionPolicy::Coerce)
            .accept(&signal)
            .is_ok());
    }
}
