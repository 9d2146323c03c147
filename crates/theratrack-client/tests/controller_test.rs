use serde::{Deserialize, Serialize};
use serde_json::json;
use theratrack_client::mock::MockTransport;
use theratrack_client::{
    ApiClient, ConfirmationGate, ControllerActor, ControllerContext, ControllerError, GateState,
    Method, NotificationCenter, PageCursor, Resource, ResourceController, SessionStore, Severity,
    NETWORK_FAILURE_MESSAGE,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Visit {
    id: i64,
    #[serde(default)]
    note: String,
    #[serde(default)]
    room: String,
}

#[derive(Debug, Serialize)]
struct VisitCreate {
    note: String,
    room: String,
}

#[derive(Debug, Default, Serialize)]
struct VisitUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    room: Option<String>,
}

impl Resource for Visit {
    type Id = i64;
    type Create = VisitCreate;
    type Update = VisitUpdate;
    const ENDPOINT: &'static str = "/visits";
    const LABEL: &'static str = "visit";
    const LABEL_PLURAL: &'static str = "visits";
    const PAGINATED: bool = true;

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Room {
    id: i64,
    name: String,
}

impl Resource for Room {
    type Id = i64;
    type Create = Room;
    type Update = Room;
    const ENDPOINT: &'static str = "/rooms";
    const LABEL: &'static str = "room";
    const LABEL_PLURAL: &'static str = "rooms";

    fn id(&self) -> i64 {
        self.id
    }
}

struct Harness<T: Resource> {
    mock: MockTransport,
    notifications: NotificationCenter,
    controller: ResourceController<T>,
    handle: JoinHandle<()>,
}

fn spawn<T: Resource>() -> Harness<T> {
    let mock = MockTransport::new();
    let session = SessionStore::in_memory();
    session.set("token-1").unwrap();
    let api = ApiClient::new("http://clinic.test/api", mock.transport(), session).unwrap();
    let notifications = NotificationCenter::new();

    let (actor, controller) = ControllerActor::<T>::new(8);
    let handle = tokio::spawn(actor.run(ControllerContext {
        api,
        notifications: notifications.clone(),
    }));

    Harness {
        mock,
        notifications,
        controller,
        handle,
    }
}

fn visit(id: i64) -> serde_json::Value {
    json!({ "id": id, "note": format!("note {id}"), "room": "A" })
}

/// Loads page 0 holding the given visit ids.
async fn seed(h: &Harness<Visit>, ids: &[i64]) {
    let content: Vec<_> = ids.iter().map(|id| visit(*id)).collect();
    h.mock
        .expect(Method::GET, "/visits?page=0&size=10")
        .respond_json(200, &json!({ "content": content, "totalPages": 1 }));
    h.controller.load(0, 10).await.unwrap();
}

fn ids(items: &[Visit]) -> Vec<i64> {
    items.iter().map(|v| v.id).collect()
}

#[tokio::test]
async fn load_replaces_collection_and_cursor() {
    let h = spawn::<Visit>();
    seed(&h, &[7, 8]).await;

    h.mock
        .expect(Method::GET, "/visits?page=2&size=10")
        .respond_json(200, &json!({ "content": [{ "id": 1 }], "totalPages": 3 }));
    let cursor = h.controller.load(2, 10).await.unwrap();

    assert_eq!(
        cursor,
        PageCursor {
            page_index: 2,
            page_size: 10,
            total_pages: 3
        }
    );
    let snapshot = h.controller.snapshot().await.unwrap();
    assert!(snapshot.loaded);
    assert_eq!(ids(&snapshot.items), vec![1]);
    assert_eq!(snapshot.cursor, cursor);

    // Loading never notifies on success
    assert!(h.notifications.visible().is_none());

    let sent = h.mock.requests();
    assert_eq!(sent[1].header("authorization"), Some("Bearer token-1"));
    h.mock.verify();
}

#[tokio::test]
async fn failed_load_keeps_previous_collection() {
    let h = spawn::<Visit>();
    seed(&h, &[7, 8]).await;

    h.mock
        .expect(Method::GET, "/visits?page=1&size=10")
        .respond_status(500, "boom");
    let err = h.controller.load(1, 10).await.unwrap_err();
    assert_eq!(err.api().and_then(|e| e.status()), Some(500));

    let snapshot = h.controller.snapshot().await.unwrap();
    assert_eq!(ids(&snapshot.items), vec![7, 8]);
    assert_eq!(snapshot.cursor.page_index, 0);

    let shown = h.notifications.visible().unwrap();
    assert_eq!(shown.severity, Severity::Error);
    assert_eq!(shown.message, "Failed to load visits. Please try again later.");
}

#[tokio::test]
async fn page_beyond_total_loads_the_last_page() {
    let h = spawn::<Visit>();
    h.mock
        .expect(Method::GET, "/visits?page=7&size=5")
        .respond_json(200, &json!({ "content": [], "totalPages": 3 }));

    h.mock
        .expect(Method::GET, "/visits?page=2&size=5")
        .respond_json(200, &json!({ "content": [visit(11), visit(12)], "totalPages": 3 }));

    let cursor = h.controller.load(7, 5).await.unwrap();
    assert_eq!(cursor.page_index, 2);
    assert_eq!(cursor.page_size, 5);

    // The stored items are the last page's, not the empty out-of-range page
    let snapshot = h.controller.snapshot().await.unwrap();
    assert_eq!(snapshot.cursor, cursor);
    assert_eq!(ids(&snapshot.items), vec![11, 12]);
    h.mock.verify();
}

#[tokio::test]
async fn last_possible_page_index_has_no_next() {
    let h = spawn::<Visit>();
    h.mock
        .expect(Method::GET, "/visits?page=4294967295&size=10")
        .respond_json(200, &json!({ "content": [], "totalPages": 0 }));

    let cursor = h.controller.load(u32::MAX, 10).await.unwrap();
    assert_eq!(cursor.page_index, u32::MAX);
    assert!(!cursor.has_next());
}

#[tokio::test]
async fn zero_page_size_is_rejected_without_a_request() {
    let h = spawn::<Visit>();
    seed(&h, &[1]).await;

    let err = h.controller.load(0, 0).await.unwrap_err();
    assert!(matches!(err, ControllerError::InvalidPageSize));

    assert_eq!(h.mock.requests().len(), 1);
    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![1]);
}

#[tokio::test]
async fn unpaginated_resource_loads_plain_array() {
    let h = spawn::<Room>();
    h.mock
        .expect(Method::GET, "/rooms")
        .respond_json(200, &json!([{ "id": 1, "name": "Blue" }, { "id": 2, "name": "Green" }]));

    let cursor = h.controller.load(3, 20).await.unwrap();
    assert_eq!(
        cursor,
        PageCursor {
            page_index: 0,
            page_size: 20,
            total_pages: 1
        }
    );
    assert_eq!(h.controller.items().await.unwrap().len(), 2);

    let sent = h.mock.requests();
    assert_eq!(sent[0].url.query(), None);
}

#[tokio::test]
async fn remove_success_drops_the_item() {
    let h = spawn::<Visit>();
    seed(&h, &[5, 6]).await;

    h.mock.expect(Method::DELETE, "/visits/5").respond_status(204, "");
    h.controller.remove(5).await.unwrap();

    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![6]);
    let shown = h.notifications.visible().unwrap();
    assert_eq!(shown.severity, Severity::Success);
    assert_eq!(shown.message, "Visit deleted successfully!");
}

#[tokio::test]
async fn remove_failure_keeps_the_item() {
    let h = spawn::<Visit>();
    seed(&h, &[5, 6]).await;

    h.mock.expect(Method::DELETE, "/visits/5").respond_status(500, "");
    assert!(h.controller.remove(5).await.is_err());

    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![5, 6]);
    let shown = h.notifications.visible().unwrap();
    assert_eq!(shown.severity, Severity::Error);
    assert_eq!(shown.message, "Failed to delete visit.");
}

#[tokio::test]
async fn unreachable_server_has_its_own_message() {
    let h = spawn::<Visit>();
    seed(&h, &[5]).await;

    h.mock.expect(Method::DELETE, "/visits/5").fail_network();
    let err = h.controller.remove(5).await.unwrap_err();
    assert!(err.api().is_some_and(|e| e.is_network()));

    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![5]);
    assert_eq!(h.notifications.current().message, NETWORK_FAILURE_MESSAGE);
}

#[tokio::test]
async fn removing_an_absent_id_leaves_collection_alone() {
    let h = spawn::<Visit>();
    seed(&h, &[5, 6]).await;

    h.mock.expect(Method::DELETE, "/visits/42").respond_status(200, "");
    h.controller.remove(42).await.unwrap();

    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![5, 6]);
}

#[tokio::test]
async fn create_appends_server_copy() {
    let h = spawn::<Visit>();
    seed(&h, &[1]).await;

    h.mock
        .expect(Method::POST, "/visits")
        .respond_json(201, &json!({ "id": 9, "note": "intake", "room": "B" }));
    let created = h
        .controller
        .create(VisitCreate {
            note: "intake".into(),
            room: "B".into(),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 9);
    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![1, 9]);
    assert_eq!(h.notifications.current().message, "Visit added successfully!");

    let sent = h.mock.requests();
    let body: serde_json::Value = serde_json::from_slice(sent[1].body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "note": "intake", "room": "B" }));
}

#[tokio::test]
async fn failed_create_leaves_collection_unchanged() {
    let h = spawn::<Visit>();
    seed(&h, &[1]).await;

    h.mock.expect(Method::POST, "/visits").respond_status(400, "bad");
    let result = h
        .controller
        .create(VisitCreate {
            note: String::new(),
            room: String::new(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![1]);
    assert_eq!(h.notifications.current().message, "Failed to add visit.");
}

#[tokio::test]
async fn update_merges_only_sent_fields() {
    let h = spawn::<Visit>();
    seed(&h, &[3]).await;

    h.mock.expect(Method::PUT, "/visits/3").respond_json(200, &visit(3));
    h.controller
        .update(
            3,
            VisitUpdate {
                note: Some("rescheduled".into()),
                room: None,
            },
        )
        .await
        .unwrap();

    let items = h.controller.items().await.unwrap();
    assert_eq!(
        items[0],
        Visit {
            id: 3,
            note: "rescheduled".into(),
            room: "A".into()
        }
    );
    assert_eq!(h.notifications.current().message, "Visit updated successfully!");
}

#[tokio::test]
async fn failed_update_leaves_item_unchanged() {
    let h = spawn::<Visit>();
    seed(&h, &[3]).await;

    h.mock.expect(Method::PUT, "/visits/3").respond_status(500, "boom");
    let result = h
        .controller
        .update(
            3,
            VisitUpdate {
                note: Some("moved".into()),
                room: Some("B".into()),
            },
        )
        .await;

    assert!(result.is_err());
    let expected: Visit = serde_json::from_value(visit(3)).unwrap();
    assert_eq!(h.controller.items().await.unwrap(), vec![expected]);
    let shown = h.notifications.visible().unwrap();
    assert_eq!(shown.severity, Severity::Error);
    assert_eq!(shown.message, "Failed to update visit.");
}

#[tokio::test]
async fn get_fetches_without_touching_collection() {
    let h = spawn::<Visit>();
    seed(&h, &[1, 2]).await;

    h.mock.expect(Method::GET, "/visits/2").respond_json(200, &visit(2));
    let fetched = h.controller.get(2).await.unwrap();
    assert_eq!(fetched.note, "note 2");

    h.mock.expect(Method::GET, "/visits/3").respond_status(404, "");
    assert!(h.controller.get(3).await.is_err());
    assert_eq!(h.notifications.current().message, "Failed to load visit.");
    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![1, 2]);
}

#[tokio::test]
async fn last_arriving_page_wins() {
    let h = spawn::<Visit>();
    let (release, held) = oneshot::channel();

    h.mock
        .expect(Method::GET, "/visits?page=0&size=10")
        .hold_until(held)
        .respond_json(200, &json!({ "content": [visit(1)], "totalPages": 2 }));
    h.mock
        .expect(Method::GET, "/visits?page=1&size=10")
        .respond_json(200, &json!({ "content": [visit(11)], "totalPages": 2 }));

    let slow = h.controller.clone();
    let first = tokio::spawn(async move { slow.load(0, 10).await });

    // The later request answers first
    let cursor = h.controller.load(1, 10).await.unwrap();
    assert_eq!(cursor.page_index, 1);

    release.send(()).unwrap();
    first.await.unwrap().unwrap();

    let snapshot = h.controller.snapshot().await.unwrap();
    assert_eq!(ids(&snapshot.items), vec![1]);
    assert_eq!(snapshot.cursor.page_index, 0);
}

#[tokio::test]
async fn teardown_drops_late_responses() {
    let h = spawn::<Visit>();
    let (release, held) = oneshot::channel();
    h.mock
        .expect(Method::DELETE, "/visits/4")
        .hold_until(held)
        .respond_status(500, "");

    let pending = h.controller.clone();
    let late = tokio::spawn(async move { pending.remove(4).await });

    while h.mock.requests().is_empty() {
        tokio::task::yield_now().await;
    }

    h.controller.teardown().await;
    h.handle.await.unwrap();
    assert!(!h.controller.is_alive());

    let _ = release.send(());
    assert_eq!(late.await.unwrap(), Err(ControllerError::Dropped));

    // The failure arrived after teardown and was not reported
    assert!(h.notifications.visible().is_none());
    assert_eq!(h.controller.load(0, 10).await, Err(ControllerError::Closed));
}

#[tokio::test]
async fn gate_closes_whatever_the_outcome() {
    let h = spawn::<Visit>();
    seed(&h, &[5, 6]).await;
    let mut gate = ConfirmationGate::<Visit>::new();

    h.mock.expect(Method::DELETE, "/visits/5").respond_status(500, "");
    gate.open(5);
    let task = gate.confirm(&h.controller).unwrap();
    assert_eq!(gate.state(), GateState::Closed);
    assert!(task.await.unwrap().is_err());
    assert_eq!(gate.state(), GateState::Closed);
    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![5, 6]);

    h.mock.expect(Method::DELETE, "/visits/6").respond_status(204, "");
    gate.open(6);
    gate.confirm(&h.controller).unwrap().await.unwrap().unwrap();
    assert_eq!(gate.state(), GateState::Closed);
    assert_eq!(ids(&h.controller.items().await.unwrap()), vec![5]);

    // Cancel sends nothing
    gate.open(5);
    gate.close();
    assert!(gate.confirm(&h.controller).is_none());
    h.mock.verify();
}

#[tokio::test]
async fn unauthorized_load_expires_the_session() {
    let h = spawn::<Room>();
    h.mock.expect(Method::GET, "/rooms").respond_status(401, "");

    let err = h.controller.load(0, 10).await.unwrap_err();
    assert_eq!(err, ControllerError::Api(theratrack_client::ApiError::Unauthorized));
    assert_eq!(h.notifications.current().message, "Failed to load rooms. Please try again later.");
}
