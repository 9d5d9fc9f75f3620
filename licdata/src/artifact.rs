//! The licdata artifact domain handler.
//!
//! A self-contained stand-in for the real artifact logic. Builds complete
//! immediately; pushes ask for the registry credential first and complete
//! once it is provided.

use licdata_core::{
    BoxError, CredentialProvided, CredentialRequested, DockerImageAvailable,
    DockerImagePushRequested, DockerImagePushed, DockerImageRequested, DomainEvent,
    DomainHandler, EventKind, RoutingError,
};
use licdata_std::{DomainAdapter, HandlerRegistryBuilder};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

/// Kinds [`LicdataArtifact`] consumes.
pub const HANDLED_KINDS: [EventKind; 3] = [
    EventKind::DockerImageRequested,
    EventKind::DockerImagePushRequested,
    EventKind::CredentialProvided,
];

/// Domain handler for image builds and pushes.
#[derive(Debug, Default)]
pub struct LicdataArtifact {
    // Pushes waiting for a credential, keyed by registry URL.
    pending: Mutex<HashMap<String, Vec<DockerImagePushRequested>>>,
}

impl LicdataArtifact {
    /// Create a handler with no pending pushes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pushes waiting for a credential.
    pub fn pending_pushes(&self) -> usize {
        self.pending.lock().values().map(Vec::len).sum()
    }

    /// Register one shared instance for every kind in [`HANDLED_KINDS`].
    pub fn adapter(self: Arc<Self>) -> Result<DomainAdapter, RoutingError> {
        let mut builder = HandlerRegistryBuilder::new();
        for kind in HANDLED_KINDS {
            builder = builder.register_shared(kind, self.clone())?;
        }
        Ok(builder.build())
    }

    fn build(&self, request: DockerImageRequested) -> Vec<DomainEvent> {
        vec![
            DockerImageAvailable {
                image_name: request.image_name,
                image_version: request.image_version,
                metadata: request.metadata,
            }
            .into(),
        ]
    }

    fn request_push(&self, request: DockerImagePushRequested) -> Vec<DomainEvent> {
        let credential = CredentialRequested {
            name: request.docker_registry_url.clone(),
            metadata: request.metadata.clone(),
        };
        self.pending
            .lock()
            .entry(request.docker_registry_url.clone())
            .or_default()
            .push(request);
        vec![credential.into()]
    }

    fn complete_pushes(&self, credential: CredentialProvided) -> Vec<DomainEvent> {
        let pushes = self
            .pending
            .lock()
            .remove(&credential.name)
            .unwrap_or_default();
        if pushes.is_empty() {
            debug!(name = %credential.name, "credential matches no pending push");
        }

        pushes
            .into_iter()
            .map(|push| {
                DockerImagePushed {
                    image_name: push.image_name,
                    image_version: push.image_version,
                    image_url: push.image_url,
                    docker_registry_url: push.docker_registry_url,
                    metadata: push.metadata,
                }
                .into()
            })
            .collect()
    }
}

impl DomainHandler for LicdataArtifact {
    type Output = Result<Vec<DomainEvent>, BoxError>;

    async fn handle(&self, event: DomainEvent) -> Self::Output {
        match event {
            DomainEvent::DockerImageRequested(request) => Ok(self.build(request)),
            DomainEvent::DockerImagePushRequested(request) => Ok(self.request_push(request)),
            DomainEvent::CredentialProvided(credential) => Ok(self.complete_pushes(credential)),
            other => Err(format!("licdata artifact does not handle {}", other.kind()).into()),
        }
    }
}
