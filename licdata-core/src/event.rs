//! Domain events and inbound signals.
//!
//! Domain events are immutable values: they are built once, handed to a
//! domain handler by value, and never mutated afterwards.

use crate::{
    kind::EventKind,
    options::{Metadata, RequestOptions},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Docker image build was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImageRequested {
    /// Derived image name, e.g. `licdata-slim-python3.12`.
    pub image_name: String,
    /// Requested version tag, if any.
    pub image_version: Option<String>,
    /// Remaining request options.
    pub metadata: Metadata,
}

/// A Docker image push was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImagePushRequested {
    /// Derived image name.
    pub image_name: String,
    /// Version tag being pushed.
    pub image_version: String,
    /// `{registry}/{image_name}:{image_version}`.
    pub image_url: String,
    /// Target registry.
    pub docker_registry_url: String,
    /// Remaining request options.
    pub metadata: Metadata,
}

/// A Docker image has been built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImageAvailable {
    /// Image name.
    pub image_name: String,
    /// Version tag, if one was requested.
    pub image_version: Option<String>,
    /// Metadata of the originating request.
    pub metadata: Metadata,
}

/// A Docker image has been pushed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerImagePushed {
    /// Image name.
    pub image_name: String,
    /// Version tag.
    pub image_version: String,
    /// Full URL the image was pushed to.
    pub image_url: String,
    /// Registry the image was pushed to.
    pub docker_registry_url: String,
    /// Metadata of the originating request.
    pub metadata: Metadata,
}

/// A credential is needed, typically for a registry login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequested {
    /// Name of the credential, e.g. the registry URL.
    pub name: String,
    /// Context for the secrets provider.
    pub metadata: Metadata,
}

/// A credential supplied by a secrets provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialProvided {
    /// Name of the credential.
    pub name: String,
    /// Secret value.
    pub value: String,
    /// Context echoed back by the secrets provider.
    pub metadata: Metadata,
}

impl fmt::Debug for CredentialProvided {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProvided")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Any event a domain handler consumes or produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DomainEvent {
    /// See [`DockerImageRequested`].
    DockerImageRequested(DockerImageRequested),
    /// See [`DockerImagePushRequested`].
    DockerImagePushRequested(DockerImagePushRequested),
    /// See [`CredentialProvided`].
    CredentialProvided(CredentialProvided),
    /// See [`CredentialRequested`].
    CredentialRequested(CredentialRequested),
    /// See [`DockerImageAvailable`].
    DockerImageAvailable(DockerImageAvailable),
    /// See [`DockerImagePushed`].
    DockerImagePushed(DockerImagePushed),
}

impl DomainEvent {
    /// The routing key of this event.
    pub const fn kind(&self) -> EventKind {
        match self {
            DomainEvent::DockerImageRequested(_) => EventKind::DockerImageRequested,
            DomainEvent::DockerImagePushRequested(_) => EventKind::DockerImagePushRequested,
            DomainEvent::CredentialProvided(_) => EventKind::CredentialProvided,
            DomainEvent::CredentialRequested(_) => EventKind::CredentialRequested,
            DomainEvent::DockerImageAvailable(_) => EventKind::DockerImageAvailable,
            DomainEvent::DockerImagePushed(_) => EventKind::DockerImagePushed,
        }
    }
}

macro_rules! impl_into_domain_event {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for DomainEvent {
                fn from(event: $variant) -> Self {
                    DomainEvent::$variant(event)
                }
            }
        )*
    };
}

impl_into_domain_event!(
    DockerImageRequested,
    DockerImagePushRequested,
    CredentialProvided,
    CredentialRequested,
    DockerImageAvailable,
    DockerImagePushed,
);

/// A decoded inbound delivery, as handed over by a transport or the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum InboundSignal {
    /// Build an image from the given options.
    DockerImageRequested(RequestOptions),
    /// Push an image described by the given options.
    DockerImagePushRequested(RequestOptions),
    /// A credential arrived.
    CredentialProvided(CredentialProvided),
}

impl InboundSignal {
    /// The routing key of this signal.
    pub const fn kind(&self) -> EventKind {
        match self {
            InboundSignal::DockerImageRequested(_) => EventKind::DockerImageRequested,
            InboundSignal::DockerImagePushRequested(_) => EventKind::DockerImagePushRequested,
            InboundSignal::CredentialProvided(_) => EventKind::CredentialProvided,
        }
    }
}
