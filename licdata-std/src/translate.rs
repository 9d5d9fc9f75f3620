//! Event translation.
//!
//! Pure mapping from request options to the image events the domain handler
//! consumes. Composite fields are derived deterministically: translating the
//! same options twice yields equal events.
//!
//! | Field | Derivation |
//! |-------|------------|
//! | `image_name` | `licdata-{variant}-python{python_version}` |
//! | `image_url` | `{docker_registry_url}/{image_name}:{image_version}` |
//! | `metadata` | options minus [`IMAGE_METADATA_EXCLUSIONS`] |

use licdata_core::{
    DockerImagePushRequested, DockerImageRequested, EventKind, OptionKey, RequestOptions,
    TranslationError, sanitize,
};

/// Keys promoted to first-class event fields, and so kept out of metadata.
pub const IMAGE_METADATA_EXCLUSIONS: [&str; 2] = [
    OptionKey::ImageVersion.as_str(),
    OptionKey::DockerRegistryUrl.as_str(),
];

/// What to do when an option needed for a derived field is absent or null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingOptionPolicy {
    /// Fail the translation with [`TranslationError::MissingOption`].
    #[default]
    Reject,
    /// Substitute the empty string in every derived field.
    Coerce,
}

impl MissingOptionPolicy {
    fn require<'a>(
        self,
        options: &'a RequestOptions,
        kind: EventKind,
        key: OptionKey,
    ) -> Result<&'a str, TranslationError> {
        match (options.value(key), self) {
            (Some(value), _) => Ok(value),
            (None, MissingOptionPolicy::Coerce) => Ok(""),
            (None, MissingOptionPolicy::Reject) => Err(TranslationError::MissingOption {
                kind,
                key: key.as_str(),
            }),
        }
    }
}

/// `licdata-{variant}-python{python_version}`.
pub fn image_name(variant: &str, python_version: &str) -> String {
    format!("licdata-{variant}-python{python_version}")
}

/// `{registry}/{image_name}:{image_version}`.
pub fn image_url(registry: &str, image_name: &str, image_version: &str) -> String {
    format!("{registry}/{image_name}:{image_version}")
}

/// Build a [`DockerImageRequested`] from request options.
///
/// `image_version` is optional; `variant` and `python_version` are governed
/// by `policy`.
pub fn translate_image_requested(
    options: &RequestOptions,
    policy: MissingOptionPolicy,
) -> Result<DockerImageRequested, TranslationError> {
    let kind = EventKind::DockerImageRequested;
    let variant = policy.require(options, kind, OptionKey::Variant)?;
    let python_version = policy.require(options, kind, OptionKey::PythonVersion)?;

    Ok(DockerImageRequested {
        image_name: image_name(variant, python_version),
        image_version: options.image_version().map(str::to_owned),
        metadata: sanitize(options, IMAGE_METADATA_EXCLUSIONS),
    })
}

/// Build a [`DockerImagePushRequested`] from request options.
///
/// Every input of `image_url` is required, subject to `policy`.
pub fn translate_image_push_requested(
    options: &RequestOptions,
    policy: MissingOptionPolicy,
) -> Result<DockerImagePushRequested, TranslationError> {
    let kind = EventKind::DockerImagePushRequested;
    let variant = policy.require(options, kind, OptionKey::Variant)?;
    let python_version = policy.require(options, kind, OptionKey::PythonVersion)?;
    let image_version = policy.require(options, kind, OptionKey::ImageVersion)?;
    let registry = policy.require(options, kind, OptionKey::DockerRegistryUrl)?;

    let name = image_name(variant, python_version);
    Ok(DockerImagePushRequested {
        image_url: image_url(registry, &name, image_version),
        image_name: name,
        image_version: image_version.to_owned(),
        docker_registry_url: registry.to_owned(),
        metadata: sanitize(options, IMAGE_METADATA_EXCLUSIONS),
    })
}
