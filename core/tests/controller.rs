//! `TodoListController` driven by in-process transports.
//!
//! `Scripted` replays canned responses and records every request. `Remote`
//! behaves like the real service, with a per-method latency on the tokio
//! test clock so concurrent dispatches interleave deterministically.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use todo_core::{
    ApiError, Draft, DraftEdit, HttpMethod, HttpRequest, HttpResponse, Intent, Theme, Todo, TodoClient, TodoId,
    TodoListController, Transport,
};

#[derive(Default)]
struct Scripted {
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    sent: RefCell<Vec<HttpRequest>>,
}

impl Scripted {
    fn reply(self, status: u16, body: serde_json::Value) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    /// Queue a response ahead of everything already scripted.
    fn first(self, status: u16, body: serde_json::Value) -> Self {
        self.responses
            .borrow_mut()
            .push_front(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    fn fail(self) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(ApiError::Transport("connection reset".into())));
        self
    }

    fn methods(&self) -> Vec<HttpMethod> {
        self.sent.borrow().iter().map(|r| r.method).collect()
    }
}

#[async_trait(?Send)]
impl Transport for Scripted {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("no scripted response left")
    }
}

fn client() -> TodoClient {
    TodoClient::new("http://test")
}

async fn mounted(transport: Scripted, initial: serde_json::Value) -> TodoListController<Scripted> {
    let controller = TodoListController::new(client(), transport.first(200, initial));
    controller.mount().await;
    controller
}

fn todo(value: serde_json::Value) -> Todo {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn mount_loads_collection() {
    let controller = mounted(Scripted::default(), json!([{"id": 1, "title": "A", "completed": false}])).await;
    let state = controller.snapshot();
    assert_eq!(state.todos(), &[todo(json!({"id": 1, "title": "A", "completed": false}))]);
    assert_eq!(controller.transport().methods(), vec![HttpMethod::Get]);
}

#[tokio::test]
async fn blank_create_sends_nothing() {
    let controller = mounted(Scripted::default(), json!([])).await;
    controller
        .dispatch(Intent::CreateRequested(Draft::new("   ", "ignored")))
        .await;
    assert_eq!(controller.transport().methods(), vec![HttpMethod::Get]);
    assert!(controller.snapshot().todos().is_empty());
}

#[tokio::test]
async fn create_appends_server_response_and_resets_draft() {
    let created = json!({"id": 2, "title": "Buy milk", "description": "2%", "completed": false});
    let controller = mounted(
        Scripted::default().reply(200, created.clone()),
        json!([{"id": 1, "title": "A", "completed": false}]),
    )
    .await;
    controller.dispatch(Intent::DraftChanged(DraftEdit::title("Buy milk"))).await;
    controller.dispatch(Intent::DraftChanged(DraftEdit::description("2%"))).await;

    let draft = controller.snapshot().draft().clone();
    controller.dispatch(Intent::CreateRequested(draft)).await;

    let state = controller.snapshot();
    assert_eq!(state.todos().len(), 2);
    assert_eq!(state.todos()[1], todo(created));
    assert_eq!(state.draft(), &Draft::default());
    assert!(!state.is_busy());
    assert_eq!(controller.transport().methods(), vec![HttpMethod::Get, HttpMethod::Post]);
}

#[tokio::test]
async fn toggle_scenario_replaces_with_refetch() {
    let controller = mounted(
        Scripted::default()
            .reply(200, json!({"id": 1, "title": "A", "completed": true}))
            .reply(200, json!([{"id": 1, "title": "A", "completed": true}])),
        json!([{"id": 1, "title": "A", "completed": false}]),
    )
    .await;

    controller.dispatch(Intent::ToggleRequested(TodoId(1))).await;

    assert_eq!(
        controller.transport().methods(),
        vec![HttpMethod::Get, HttpMethod::Put, HttpMethod::Get]
    );
    assert_eq!(
        controller.snapshot().todos(),
        &[todo(json!({"id": 1, "title": "A", "completed": true}))]
    );
}

#[tokio::test]
async fn refetch_result_wins_over_put_response() {
    // The server answers the PUT with one thing and the list with another;
    // the list is what the user sees.
    let controller = mounted(
        Scripted::default()
            .reply(200, json!({"id": 1, "title": "A", "completed": true}))
            .reply(200, json!([{"id": 1, "title": "A (server renamed)", "completed": true}])),
        json!([{"id": 1, "title": "A", "completed": false}]),
    )
    .await;

    controller.dispatch(Intent::ToggleRequested(TodoId(1))).await;

    assert_eq!(controller.snapshot().todos()[0].title, "A (server renamed)");
}

#[tokio::test]
async fn delete_refetches_and_drops_item() {
    let controller = mounted(
        Scripted::default().reply(200, json!("Success")).reply(200, json!([])),
        json!([{"id": 1, "title": "A", "completed": false}]),
    )
    .await;

    controller.dispatch(Intent::DeleteRequested(TodoId(1))).await;

    assert_eq!(
        controller.transport().methods(),
        vec![HttpMethod::Get, HttpMethod::Delete, HttpMethod::Get]
    );
    assert!(controller.snapshot().todo(TodoId(1)).is_none());
}

#[tokio::test]
async fn failures_are_absorbed() {
    let controller = mounted(
        Scripted::default()
            .fail()
            .reply(500, json!("boom"))
            .reply(404, json!(null))
            .fail(),
        json!([{"id": 1, "title": "A", "completed": false}]),
    )
    .await;
    controller.dispatch(Intent::DraftChanged(DraftEdit::title("pending"))).await;
    let before = controller.snapshot();

    let draft = before.draft().clone();
    controller.dispatch(Intent::CreateRequested(draft)).await;
    controller.dispatch(Intent::ToggleRequested(TodoId(1))).await;
    controller.dispatch(Intent::DeleteRequested(TodoId(1))).await;
    controller.dispatch(Intent::Mounted).await;

    let after = controller.snapshot();
    assert_eq!(after.todos(), before.todos());
    assert_eq!(after.draft(), before.draft());
    assert!(!after.is_busy());
    // No refetch followed any failed mutation.
    assert_eq!(
        controller.transport().methods(),
        vec![
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Get
        ]
    );
}

#[tokio::test]
async fn theme_listener_sees_each_flip_and_no_request_is_made() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let controller = TodoListController::new(client(), Scripted::default())
        .on_theme_change(move |theme| sink.borrow_mut().push(theme));

    controller.dispatch(Intent::ThemeToggleRequested).await;
    controller.dispatch(Intent::ThemeToggleRequested).await;

    assert_eq!(*seen.borrow(), vec![Theme::Dark, Theme::Light]);
    assert_eq!(controller.snapshot().theme(), Theme::Light);
    assert!(controller.transport().methods().is_empty());
}

#[tokio::test]
async fn unmount_hands_back_final_state() {
    let controller = mounted(Scripted::default(), json!([{"id": 3, "title": "C", "completed": true}])).await;
    let state = controller.unmount();
    assert_eq!(state.summary().completed, 1);
}

// ---------------------------------------------------------------------------
// Interleaving
// ---------------------------------------------------------------------------

/// In-memory stand-in for the remote service with per-method latency.
struct Remote {
    todos: RefCell<Vec<Todo>>,
    next_id: Cell<i64>,
    latency: fn(HttpMethod) -> Duration,
    sent: RefCell<Vec<HttpMethod>>,
}

impl Remote {
    fn new(todos: Vec<Todo>, latency: fn(HttpMethod) -> Duration) -> Self {
        let next_id = todos.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
        Self {
            todos: RefCell::new(todos),
            next_id: Cell::new(next_id),
            latency,
            sent: RefCell::new(Vec::new()),
        }
    }

    fn apply(&self, request: &HttpRequest) -> HttpResponse {
        let id: Option<i64> = request.path.rsplit('/').next().and_then(|s| s.parse().ok());
        let mut todos = self.todos.borrow_mut();
        match (request.method, id) {
            (HttpMethod::Get, None) => HttpResponse::new(200, serde_json::to_string(&*todos).unwrap()),
            (HttpMethod::Post, None) => {
                let input: Draft = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                let created = todo(json!({
                    "id": self.next_id.get(),
                    "title": input.title,
                    "description": input.description,
                    "completed": false
                }));
                self.next_id.set(self.next_id.get() + 1);
                todos.push(created.clone());
                HttpResponse::new(200, serde_json::to_string(&created).unwrap())
            }
            (HttpMethod::Put, Some(id)) => {
                let input: Todo = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
                match todos.iter_mut().find(|t| t.id.0 == id) {
                    Some(existing) => {
                        existing.completed = input.completed;
                        HttpResponse::new(200, serde_json::to_string(&*existing).unwrap())
                    }
                    None => HttpResponse::new(404, ""),
                }
            }
            (HttpMethod::Delete, Some(id)) => {
                todos.retain(|t| t.id.0 != id);
                HttpResponse::new(200, "Success")
            }
            _ => HttpResponse::new(405, ""),
        }
    }
}

#[async_trait(?Send)]
impl Transport for Remote {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.sent.borrow_mut().push(request.method);
        tokio::time::sleep((self.latency)(request.method)).await;
        Ok(self.apply(&request))
    }
}

#[tokio::test(start_paused = true)]
async fn toggle_and_delete_race_without_coalescing() {
    // DELETE lands first; the slower PUT then finds nothing and fails.
    fn latency(method: HttpMethod) -> Duration {
        match method {
            HttpMethod::Put => Duration::from_millis(50),
            _ => Duration::from_millis(5),
        }
    }
    let remote = Remote::new(
        vec![todo(json!({"id": 1, "title": "A", "completed": false}))],
        latency,
    );
    let controller = TodoListController::new(client(), remote);
    controller.mount().await;

    tokio::join!(
        controller.dispatch(Intent::ToggleRequested(TodoId(1))),
        controller.dispatch(Intent::DeleteRequested(TodoId(1))),
    );

    let sent = controller.transport().sent.borrow().clone();
    assert_eq!(
        sent,
        vec![HttpMethod::Get, HttpMethod::Put, HttpMethod::Delete, HttpMethod::Get],
        "both mutations are sent; only the successful one refetches"
    );
    assert!(controller.snapshot().todos().is_empty());
}

#[tokio::test(start_paused = true)]
async fn busy_only_guards_create() {
    fn latency(_: HttpMethod) -> Duration {
        Duration::from_millis(10)
    }
    let remote = Remote::new(
        vec![todo(json!({"id": 1, "title": "A", "completed": false}))],
        latency,
    );
    let controller = TodoListController::new(client(), remote);
    controller.mount().await;

    let first = Draft::new("first", "");
    let second = Draft::new("second", "");
    tokio::join!(
        controller.dispatch(Intent::CreateRequested(first)),
        async {
            tokio::task::yield_now().await;
            // Both run while the POST is in flight.
            assert!(controller.snapshot().is_busy());
            controller.dispatch(Intent::CreateRequested(second)).await;
            controller.dispatch(Intent::ToggleRequested(TodoId(1))).await;
        },
    );

    let state = controller.snapshot();
    assert!(!state.is_busy());
    let titles: Vec<_> = state.todos().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "first"]);
    assert!(state.todo(TodoId(1)).unwrap().completed);
    assert_eq!(
        controller
            .transport()
            .sent
            .borrow()
            .iter()
            .filter(|m| **m == HttpMethod::Post)
            .count(),
        1
    );
}
