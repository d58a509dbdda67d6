//! Worker round-trip tests
//!
//! Drive a worker backed by the mock provider through the full
//! request/response protocol and assert on what arrives in the mailbox:
//! notification ordering, error envelopes, paging, and lifecycle.

mod common;

use std::time::Duration;

use tokio::time::{sleep, timeout};

use common::{FLAKY_DATABASE, MockProvider, test_config, unreachable_config};
use vizmongo::dispatch::{Dispatcher, Mailbox};
use vizmongo::message::{Message, Notification, Request, Response};
use vizmongo::worker::{self, WorkerHandle};

async fn next_message(mailbox: &mut Mailbox) -> Message {
    timeout(Duration::from_secs(5), mailbox.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("dispatcher closed")
}

async fn next_response(mailbox: &mut Mailbox) -> Response {
    loop {
        if let Message::Response(response) = next_message(mailbox).await {
            return response;
        }
    }
}

/// Spawn a worker against the mock provider and connect it, draining the
/// connect notifications and response.
async fn connected_worker(dispatcher: &Dispatcher, mailbox: &mut Mailbox) -> WorkerHandle {
    let worker = worker::spawn::<MockProvider>(dispatcher.clone(), test_config());
    assert!(worker.submit(Request::EstablishConnection {
        sender: mailbox.id()
    }));
    let response = next_response(mailbox).await;
    assert!(!response.is_error());
    worker
}

#[tokio::test]
async fn connect_emits_notifications_then_response() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = worker::spawn::<MockProvider>(dispatcher.clone(), test_config());
    assert!(worker.submit(Request::EstablishConnection {
        sender: mailbox.id()
    }));

    assert!(matches!(
        next_message(&mut mailbox).await,
        Message::Notification(Notification::Connecting { .. })
    ));
    assert!(matches!(
        next_message(&mut mailbox).await,
        Message::Notification(Notification::ConnectionEstablished { .. })
    ));
    match next_message(&mut mailbox).await {
        Message::Response(Response::EstablishConnection(Ok(address))) => {
            assert_eq!(address, "localhost:27017");
        }
        other => panic!("unexpected message: {}", other.label()),
    }
}

#[tokio::test]
async fn failed_connect_reports_error_envelope() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = worker::spawn::<MockProvider>(dispatcher.clone(), unreachable_config());
    assert!(worker.submit(Request::EstablishConnection {
        sender: mailbox.id()
    }));

    assert!(matches!(
        next_message(&mut mailbox).await,
        Message::Notification(Notification::Connecting { .. })
    ));
    match next_message(&mut mailbox).await {
        Message::Notification(Notification::ConnectionFailed { message, .. }) => {
            assert!(message.contains("no route to host"));
        }
        other => panic!("unexpected message: {}", other.label()),
    }
    let response = next_response(&mut mailbox).await;
    assert!(response.is_error());
    assert!(
        response
            .error_message()
            .unwrap()
            .contains("no route to host")
    );
}

#[tokio::test]
async fn database_names_broadcast_precedes_response() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = connected_worker(&dispatcher, &mut mailbox).await;

    assert!(worker.submit(Request::LoadDatabaseNames {
        sender: mailbox.id()
    }));
    match next_message(&mut mailbox).await {
        Message::Notification(Notification::DatabaseListLoaded { databases }) => {
            assert_eq!(databases, vec!["admin", "inventory"]);
        }
        other => panic!("unexpected message: {}", other.label()),
    }
    match next_response(&mut mailbox).await {
        Response::DatabaseNames(Ok(names)) => assert_eq!(names, vec!["admin", "inventory"]),
        other => panic!("unexpected response: {}", other.label()),
    }
}

#[tokio::test]
async fn request_before_connect_is_not_connected() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = worker::spawn::<MockProvider>(dispatcher.clone(), test_config());

    assert!(worker.submit(Request::LoadDatabaseNames {
        sender: mailbox.id()
    }));
    // No DatabaseListLoaded broadcast on the failure path: the first
    // message must be the response itself.
    match next_message(&mut mailbox).await {
        Message::Response(response) => {
            assert!(response.is_error());
            assert_eq!(
                response.error_message().unwrap(),
                "Not connected to a server"
            );
        }
        other => panic!("unexpected message: {}", other.label()),
    }
}

#[tokio::test]
async fn collection_listing_failure_is_an_envelope() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = connected_worker(&dispatcher, &mut mailbox).await;

    assert!(worker.submit(Request::LoadCollectionNames {
        sender: mailbox.id(),
        database: FLAKY_DATABASE.to_string(),
    }));
    let response = next_response(&mut mailbox).await;
    assert!(response.is_error());
    assert_eq!(response.error_message().unwrap(), "Operation timed out");
}

#[tokio::test]
async fn query_pages_documents() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = connected_worker(&dispatcher, &mut mailbox).await;

    assert!(worker.submit(Request::ExecuteQuery {
        sender: mailbox.id(),
        namespace: "inventory.products".parse().unwrap(),
        take: 1,
        skip: 1,
    }));
    match next_message(&mut mailbox).await {
        Message::Notification(Notification::DocumentListLoaded {
            namespace,
            documents,
        }) => {
            assert_eq!(namespace, "inventory.products");
            assert_eq!(documents.len(), 1);
        }
        other => panic!("unexpected message: {}", other.label()),
    }
    match next_response(&mut mailbox).await {
        Response::Query(Ok(page)) => {
            assert_eq!(page.documents.len(), 1);
            assert_eq!(page.documents[0].get_str("sku").unwrap(), "hammer");
            assert_eq!(page.skip, 1);
            assert_eq!(page.take, 1);
        }
        other => panic!("unexpected response: {}", other.label()),
    }
}

#[tokio::test]
async fn shell_opens_once_per_database() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = connected_worker(&dispatcher, &mut mailbox).await;

    let script = r#"{"ping": 1}"#;
    assert!(worker.submit(Request::ExecuteScript {
        sender: mailbox.id(),
        database: "inventory".to_string(),
        script: script.to_string(),
        take: 0,
        skip: 0,
    }));
    assert!(matches!(
        next_message(&mut mailbox).await,
        Message::Notification(Notification::ShellOpened { .. })
    ));
    assert!(matches!(
        next_message(&mut mailbox).await,
        Message::Notification(Notification::ScriptExecuted { .. })
    ));
    assert!(!next_response(&mut mailbox).await.is_error());

    // Second script against the same database: no ShellOpened this time.
    assert!(worker.submit(Request::ExecuteScript {
        sender: mailbox.id(),
        database: "inventory".to_string(),
        script: script.to_string(),
        take: 0,
        skip: 0,
    }));
    assert!(matches!(
        next_message(&mut mailbox).await,
        Message::Notification(Notification::ScriptExecuted { .. })
    ));
    assert!(!next_response(&mut mailbox).await.is_error());
}

#[tokio::test]
async fn finalize_stops_worker() {
    let dispatcher = Dispatcher::new();
    let mut mailbox = dispatcher.register();
    let worker = connected_worker(&dispatcher, &mut mailbox).await;

    assert!(worker.submit(Request::Finalize {
        sender: mailbox.id()
    }));
    match next_response(&mut mailbox).await {
        Response::Finalize(result) => assert!(result.is_ok()),
        other => panic!("unexpected response: {}", other.label()),
    }

    // The task winds down right after the response; poll until the
    // handle reports it gone.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if !worker.submit(Request::Init {
            sender: mailbox.id(),
        }) {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "worker still accepting requests after finalize"
        );
        sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn broadcasts_reach_observers_but_responses_do_not() {
    let dispatcher = Dispatcher::new();
    let mut requester = dispatcher.register();
    let mut observer = dispatcher.register();
    let worker = worker::spawn::<MockProvider>(dispatcher.clone(), test_config());

    assert!(worker.submit(Request::EstablishConnection {
        sender: requester.id()
    }));
    assert!(!next_response(&mut requester).await.is_error());

    // The observer sees both connect notifications...
    assert!(matches!(
        next_message(&mut observer).await,
        Message::Notification(Notification::Connecting { .. })
    ));
    assert!(matches!(
        next_message(&mut observer).await,
        Message::Notification(Notification::ConnectionEstablished { .. })
    ));
    // ...but the response was addressed to the requester alone.
    assert!(observer.try_recv().is_none());
}
