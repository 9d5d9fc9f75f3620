use licdata::{
    BusScope, DispatchError, DomainEvent, EventKind, EventRouter, HandlerRegistryBuilder,
    InboundSignal, Metadata, MissingOptionPolicy, PublishError, RequestOptions, RoutingTable,
    TranslationError,
    acceptors::ImageRequestedAcceptor,
    emitters::TransportEmitter,
    testing::{RecordingEmitter, RecordingTransport, ScriptedHandler},
};
use std::sync::{Arc, atomic::Ordering};

mod common;
use common::{
    CountingAcceptor, adapter_for, available, build_options, build_request, push_request,
    scripted_router,
};

#[tokio::test]
async fn test_empty_result_publishes_nothing() {
    let transport = RecordingTransport::new();
    let handler = ScriptedHandler::returning(vec![]);
    let router = scripted_router(&transport, EventKind::DockerImageRequested, &handler);

    let report = router.dispatch(build_request()).await.unwrap();

    assert!(!report.is_ignored());
    assert!(report.published().is_empty());
    assert_eq!(handler.call_count(), 1);
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_results_published_in_returned_order() {
    let transport = RecordingTransport::new();
    let handler = ScriptedHandler::returning(vec![available("3"), available("1"), available("2")]);
    let router = scripted_router(&transport, EventKind::DockerImageRequested, &handler);

    router.dispatch(build_request()).await.unwrap();

    let published: Vec<DomainEvent> = transport.published().into_iter().map(|(e, _)| e).collect();
    assert_eq!(published, vec![available("3"), available("1"), available("2")]);
}

#[tokio::test]
async fn test_unregistered_inbound_kind_never_reaches_translator() {
    let transport = RecordingTransport::new();
    let acceptor = CountingAcceptor::new(ImageRequestedAcceptor::default());
    let calls = acceptor.counter();
    let table = RoutingTable::builder()
        .inbound(EventKind::DockerImageRequested, BusScope::System, acceptor)
        .unwrap()
        .build();
    let handler = ScriptedHandler::returning(vec![]);
    let router = EventRouter::new(table, adapter_for(EventKind::DockerImagePushRequested, &handler));

    let report = router.dispatch(push_request()).await.unwrap();

    assert!(report.is_ignored());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(handler.call_count(), 0);
    assert_eq!(transport.attempts(), 0);
}

#[tokio::test]
async fn test_publish_failure_does_not_stop_remaining_results() {
    let transport = RecordingTransport::new();
    transport.fail_on(EventKind::CredentialRequested);
    let credential = DomainEvent::from(licdata::CredentialRequested {
        name: "registry.example.com".into(),
        metadata: Metadata::empty(),
    });
    let handler = ScriptedHandler::returning(vec![available("1"), credential, available("2")]);
    let router = scripted_router(&transport, EventKind::DockerImageRequested, &handler);

    let report = router.dispatch(build_request()).await.unwrap();

    assert_eq!(transport.attempts(), 3);
    assert_eq!(
        report.published(),
        &[EventKind::DockerImageAvailable, EventKind::DockerImageAvailable]
    );
    assert_eq!(report.failures().len(), 1);
    assert_eq!(report.failures()[0].kind, EventKind::CredentialRequested);
    assert!(matches!(
        report.failures()[0].error,
        PublishError::Transport(_)
    ));
    assert!(!report.is_clean());
}

#[tokio::test]
async fn test_result_without_outbound_route_is_reported() {
    let transport = RecordingTransport::new();
    let echo = DomainEvent::from(
        licdata::translate::translate_image_requested(&build_options(), MissingOptionPolicy::Reject)
            .unwrap(),
    );
    let handler = ScriptedHandler::returning(vec![echo, available("1")]);
    let router = scripted_router(&transport, EventKind::DockerImageRequested, &handler);

    let report = router.dispatch(build_request()).await.unwrap();

    assert_eq!(report.unrouted(), &[EventKind::DockerImageRequested]);
    assert_eq!(report.published(), &[EventKind::DockerImageAvailable]);
    assert_eq!(transport.published_kinds(), vec![EventKind::DockerImageAvailable]);
}

#[tokio::test]
async fn test_push_request_translated_for_handler() {
    let transport = RecordingTransport::new();
    let handler = ScriptedHandler::returning(vec![]);
    let router = scripted_router(&transport, EventKind::DockerImagePushRequested, &handler);

    router.dispatch(push_request()).await.unwrap();

    match handler.inputs().as_slice() {
        [DomainEvent::DockerImagePushRequested(event)] => {
            assert_eq!(event.image_name, "licdata-slim-python3.12");
            assert_eq!(event.image_version, "1.0");
            assert_eq!(
                event.image_url,
                "registry.example.com/licdata-slim-python3.12:1.0"
            );
            assert_eq!(event.docker_registry_url, "registry.example.com");
            assert!(!event.metadata.contains_key("image_version"));
            assert!(!event.metadata.contains_key("docker_registry_url"));
            assert_eq!(event.metadata.get("variant"), Some("slim"));
        }
        other => panic!("unexpected inputs: {other:?}"),
    }
}

#[tokio::test]
async fn test_same_request_twice_yields_equal_events() {
    let transport = RecordingTransport::new();
    let handler = ScriptedHandler::returning(vec![]);
    let router = scripted_router(&transport, EventKind::DockerImagePushRequested, &handler);

    router.dispatch(push_request()).await.unwrap();
    router.dispatch(push_request()).await.unwrap();

    let inputs = handler.inputs();
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0], inputs[1]);
}

#[tokio::test]
async fn test_missing_registry_rejected_by_default() {
    let transport = RecordingTransport::new();
    let handler = ScriptedHandler::returning(vec![]);
    let router = scripted_router(&transport, EventKind::DockerImagePushRequested, &handler);

    let err = router
        .dispatch(InboundSignal::DockerImagePushRequested(build_options()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DispatchError::Translation(TranslationError::MissingOption {
            kind: EventKind::DockerImagePushRequested,
            key: "docker_registry_url",
        })
    ));
    assert_eq!(handler.call_count(), 0);
}

#[tokio::test]
async fn test_lenient_policy_coerces_missing_options() {
    let emitter = RecordingEmitter::new();
    let table = RoutingTable::standard(
        MissingOptionPolicy::Coerce,
        Arc::new(emitter.clone()),
        BusScope::Session,
    )
    .unwrap();
    let handler = ScriptedHandler::returning(vec![available("1")]);
    let router = EventRouter::new(table, adapter_for(EventKind::DockerImagePushRequested, &handler));

    router
        .dispatch(InboundSignal::DockerImagePushRequested(RequestOptions::new()))
        .await
        .unwrap();

    match handler.inputs().as_slice() {
        [DomainEvent::DockerImagePushRequested(event)] => {
            assert_eq!(event.image_name, "licdata--python");
            assert_eq!(event.image_url, "/licdata--python:");
        }
        other => panic!("unexpected inputs: {other:?}"),
    }
    assert_eq!(emitter.emitted(), vec![(available("1"), BusScope::Session)]);
}

#[tokio::test]
async fn test_handler_failure_aborts_only_its_pipeline() {
    let transport = RecordingTransport::new();
    let handler = ScriptedHandler::returning(vec![available("1")]);
    let router = scripted_router(&transport, EventKind::DockerImageRequested, &handler);

    handler.set_error("docker daemon unreachable");
    let err = router.dispatch(build_request()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Domain { .. }));
    assert_eq!(transport.attempts(), 0);

    handler.clear_error();
    let report = router.dispatch(build_request()).await.unwrap();
    assert!(report.is_clean());
    assert_eq!(transport.published_kinds(), vec![EventKind::DockerImageAvailable]);
}

#[tokio::test]
async fn test_custom_table_routes_to_chosen_scopes() {
    let session = RecordingTransport::new();
    let table = RoutingTable::builder()
        .inbound(
            EventKind::DockerImageRequested,
            BusScope::System,
            ImageRequestedAcceptor::default(),
        )
        .unwrap()
        .outbound(
            EventKind::DockerImageAvailable,
            BusScope::Session,
            Arc::new(TransportEmitter::new(Arc::new(session.clone()))),
        )
        .unwrap()
        .build();
    let adapter = HandlerRegistryBuilder::new()
        .register(EventKind::DockerImageRequested, ScriptedHandler::returning(vec![available("1")]))
        .unwrap()
        .build();
    let router = EventRouter::new(table, adapter);

    router.dispatch(build_request()).await.unwrap();

    assert_eq!(session.published(), vec![(available("1"), BusScope::Session)]);
}
