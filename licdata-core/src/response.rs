//! Result normalization for domain handlers.

use crate::{error::BoxError, event::DomainEvent};

/// Trait for converting a domain handler's output into an ordered sequence
/// of result events.
///
/// # Default Implementations
///
/// - `()` → no events
/// - `DomainEvent` → exactly one event
/// - `Option<T>` → `None` is no events, `Some` delegates to `T`
/// - `Vec<DomainEvent>` → the events, in order
/// - `Result<T, E>` → delegates to inner `T` or propagates the error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into result events",
    label = "missing `IntoResultEvents` implementation",
    note = "Domain handlers must return (), a DomainEvent, a Vec of them, an Option or a Result."
)]
pub trait IntoResultEvents {
    /// Convert the output into result events or an error.
    fn into_result_events(self) -> Result<Vec<DomainEvent>, BoxError>;
}

impl IntoResultEvents for () {
    fn into_result_events(self) -> Result<Vec<DomainEvent>, BoxError> {
        Ok(Vec::new())
    }
}

impl IntoResultEvents for DomainEvent {
    fn into_result_events(self) -> Result<Vec<DomainEvent>, BoxError> {
        Ok(vec![self])
    }
}

impl IntoResultEvents for Vec<DomainEvent> {
    fn into_result_events(self) -> Result<Vec<DomainEvent>, BoxError> {
        Ok(self)
    }
}

impl<T: IntoResultEvents> IntoResultEvents for Option<T> {
    fn into_result_events(self) -> Result<Vec<DomainEvent>, BoxError> {
        match self {
            Some(t) => t.into_result_events(),
            None => Ok(Vec::new()),
        }
    }
}

impl<T, E> IntoResultEvents for Result<T, E>
where
    T: IntoResultEvents,
    E: Into<BoxError>,
{
    fn into_result_events(self) -> Result<Vec<DomainEvent>, BoxError> {
        match self {
            Ok(t) => t.into_result_events(),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event::CredentialRequested, options::Metadata};

    fn event(name: &str) -> DomainEvent {
        CredentialRequested {
            name: name.into(),
            metadata: Metadata::empty(),
        }
        .into()
    }

    #[test]
    fn test_unit_and_none_are_empty() {
        assert!(().into_result_events().unwrap().is_empty());
        assert!(None::<DomainEvent>.into_result_events().unwrap().is_empty());
    }

    #[test]
    fn test_vec_keeps_order() {
        let events = vec![event("a"), event("b"), event("c")];
        assert_eq!(events.clone().into_result_events().unwrap(), events);
    }

    #[test]
    fn test_result_propagates_error() {
        let output: Result<DomainEvent, std::io::Error> =
            Err(std::io::Error::other("intentional failure"));
        let err = output.into_result_events().unwrap_err();
        assert_eq!(err.to_string(), "intentional failure");
    }
}
