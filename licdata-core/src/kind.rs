//! Event kinds and bus scopes.
//!
//! Both are plain `Copy` keys: the routing table is indexed by [`EventKind`],
//! and every route carries the [`BusScope`] it is subscribed or published on.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Every event kind the licdata artifact application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// A Docker image build was requested.
    DockerImageRequested,
    /// A Docker image push was requested.
    DockerImagePushRequested,
    /// A credential was supplied by a secrets provider.
    CredentialProvided,
    /// A credential is needed.
    CredentialRequested,
    /// A Docker image has been built and is available locally.
    DockerImageAvailable,
    /// A Docker image has been pushed to a registry.
    DockerImagePushed,
}

impl EventKind {
    /// All kinds, inbound first.
    pub const ALL: [EventKind; 6] = [
        EventKind::DockerImageRequested,
        EventKind::DockerImagePushRequested,
        EventKind::CredentialProvided,
        EventKind::CredentialRequested,
        EventKind::DockerImageAvailable,
        EventKind::DockerImagePushed,
    ];

    /// Stable, human readable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::DockerImageRequested => "docker-image-requested",
            EventKind::DockerImagePushRequested => "docker-image-push-requested",
            EventKind::CredentialProvided => "credential-provided",
            EventKind::CredentialRequested => "credential-requested",
            EventKind::DockerImageAvailable => "docker-image-available",
            EventKind::DockerImagePushed => "docker-image-pushed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an [`EventKind`] or [`BusScope`] from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what}: {value}")]
pub struct ParseKindError {
    what: &'static str,
    value: String,
}

impl FromStr for EventKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError {
                what: "event kind",
                value: s.to_owned(),
            })
    }
}

/// Transport-level selector controlling the delivery reach of an event kind.
///
/// The router never interprets a scope; it only hands it to the transport.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BusScope {
    /// System-wide reach.
    #[default]
    System,
    /// Reach limited to the current session.
    Session,
}

impl BusScope {
    /// Lowercase name, as accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            BusScope::System => "system",
            BusScope::Session => "session",
        }
    }
}

impl fmt::Display for BusScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusScope {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(BusScope::System),
            "session" => Ok(BusScope::Session),
            _ => Err(ParseKindError {
                what: "bus scope",
                value: s.to_owned(),
            }),
        }
    }
}
