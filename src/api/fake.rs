//! In-memory REST backend for tests
//!
//! Implements `Transport` with the same envelopes and shapes as the real
//! server, records every request, and can be told to fail.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;
use serde_json::{json, Value};

use super::{ApiClient, ApiRequest, Method, RawResponse, Transport};
use crate::error::ApiError;
use crate::session::Session;

enum Scripted {
    Respond(RawResponse),
    Offline,
}

#[derive(Default)]
struct FakeState {
    templates: Vec<Value>,
    expenses: Vec<Value>,
    users: Vec<(String, String, String)>,
    next_id: i64,
    requests: Vec<ApiRequest>,
    scripted: VecDeque<Scripted>,
    offline: bool,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

fn id_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn reply(status: u16, body: Value) -> RawResponse {
    RawResponse { status, body: body.to_string() }
}

fn not_found() -> RawResponse {
    reply(404, json!({ "code": 404, "message": "Not found" }))
}

/// Flat write shape -> nested read shape
fn expense_read_shape(id: Value, draft: &Value) -> Value {
    json!({
        "id": id,
        "name": draft["name"],
        "description": draft["description"],
        "type": draft["type"],
        "template": [{
            "templateId": draft["templateId"],
            "isDefault": draft["isDefault"],
        }],
    })
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.lock().next_id = 100;
        backend
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake backend lock poisoned")
    }

    /// Client pointed at this backend with a fresh in-memory session
    pub fn client(self: &Arc<Self>) -> ApiClient {
        self.client_with_session(Session::in_memory())
    }

    pub fn client_with_session(self: &Arc<Self>, session: Session) -> ApiClient {
        ApiClient::new(
            Url::parse("http://api.test/").expect("valid test URL"),
            session,
            self.clone(),
        )
    }

    pub fn add_user(&self, email: &str, password: &str, token: &str) {
        self.lock()
            .users
            .push((email.to_string(), password.to_string(), token.to_string()));
    }

    pub fn with_template(&self, id: impl Into<Value>, name: &str) {
        self.lock().templates.push(json!({ "id": id.into(), "name": name }));
    }

    /// Seed an expense from its flat write shape
    pub fn with_expense(&self, id: impl Into<Value>, draft: Value) {
        let entry = expense_read_shape(id.into(), &draft);
        self.lock().expenses.push(entry);
    }

    pub fn templates(&self) -> Vec<Value> {
        self.lock().templates.clone()
    }

    pub fn expenses(&self) -> Vec<Value> {
        self.lock().expenses.clone()
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Next request gets this status and raw body
    pub fn fail_next(&self, status: u16, body: &str) {
        self.lock().scripted.push_back(Scripted::Respond(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn respond_next(&self, status: u16, body: &Value) {
        self.lock()
            .scripted
            .push_back(Scripted::Respond(reply(status, body.clone())));
    }

    /// Next request fails before reaching the server
    pub fn drop_next(&self) {
        self.lock().scripted.push_back(Scripted::Offline);
    }

    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    fn route(state: &mut FakeState, request: &ApiRequest) -> RawResponse {
        let segments: Vec<&str> = request.path.split('/').collect();
        let body = request.body.clone().unwrap_or(Value::Null);

        match (request.method, segments.as_slice()) {
            (Method::Post, ["auth", "login"]) => {
                let found = state.users.iter().find(|(email, password, _)| {
                    body["email"] == json!(email) && body["password"] == json!(password)
                });
                match found {
                    Some((_, _, token)) => reply(200, json!({ "code": 200, "data": { "token": token } })),
                    None => reply(401, json!({ "code": 401, "message": "Invalid credentials" })),
                }
            }
            (Method::Post, ["auth", "register"]) => reply(
                200,
                json!({ "code": 200, "data": { "email": body["email"], "role": body["role"] } }),
            ),

            (Method::Get, ["template"]) => reply(200, json!({ "data": state.templates })),
            (Method::Post, ["template"]) => {
                state.next_id += 1;
                let template = json!({ "id": state.next_id, "name": body["name"] });
                state.templates.push(template.clone());
                reply(200, json!({ "data": template }))
            }
            (Method::Put, ["template", id]) => {
                match state.templates.iter_mut().find(|t| id_text(&t["id"]) == *id) {
                    Some(template) => {
                        template["name"] = body["name"].clone();
                        template["allowedEditDays"] = body["allowedEditDays"].clone();
                        reply(200, json!({ "data": template.clone() }))
                    }
                    None => not_found(),
                }
            }
            (Method::Delete, ["template", id]) => {
                let before = state.templates.len();
                state.templates.retain(|t| id_text(&t["id"]) != *id);
                if state.templates.len() == before {
                    not_found()
                } else {
                    reply(200, json!({ "data": { "deleted": true } }))
                }
            }

            (Method::Get, ["expense"]) => reply(200, json!({ "code": 200, "data": state.expenses })),
            (Method::Post, ["expense"]) => {
                state.next_id += 1;
                let entry = expense_read_shape(json!(state.next_id), &body);
                state.expenses.push(entry.clone());
                reply(200, json!({ "code": 200, "data": entry }))
            }
            (Method::Put, ["expense", id]) => {
                match state.expenses.iter_mut().find(|e| id_text(&e["id"]) == *id) {
                    Some(entry) => {
                        *entry = expense_read_shape(entry["id"].clone(), &body);
                        reply(200, json!({ "code": 200, "data": [1] }))
                    }
                    None => not_found(),
                }
            }
            (Method::Delete, ["expense", id]) => {
                let before = state.expenses.len();
                state.expenses.retain(|e| id_text(&e["id"]) != *id);
                if state.expenses.len() == before {
                    not_found()
                } else {
                    reply(200, json!({ "code": 200, "data": null }))
                }
            }

            _ => not_found(),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        if state.offline {
            return Err(ApiError::Transport("network unreachable".to_string()));
        }
        match state.scripted.pop_front() {
            Some(Scripted::Respond(response)) => return Ok(response),
            Some(Scripted::Offline) => {
                return Err(ApiError::Transport("connection reset".to_string()))
            }
            None => {}
        }

        Ok(Self::route(&mut state, &request))
    }
}
