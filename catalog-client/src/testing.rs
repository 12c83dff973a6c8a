//! Test doubles for the engine seams

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use shared::CatalogEvent;
use tokio::sync::Notify;

use crate::bus::CatalogObserver;
use crate::transport::{Transport, TransportResponse};
use crate::ui::{Dialog, Navigator, Presenter};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub endpoint: String,
    pub body: Option<Value>,
    pub form: Vec<(String, String)>,
}

/// Transport answering from fixed routes first, then from a FIFO script.
/// Unscripted requests get a 404. A held transport parks every request
/// until the gate is notified.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, TransportResponse>>,
    script: Mutex<VecDeque<Result<TransportResponse, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fixed answer for `"METHOD endpoint"`, reused on every call
    pub fn route(&self, key: &str, response: TransportResponse) {
        self.routes.lock().unwrap().insert(key.to_string(), response);
    }

    pub fn respond(&self, response: TransportResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, message: &str) {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
    }

    /// `"METHOD endpoint"` per call, in issue order
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| format!("{} {}", c.method, c.endpoint))
            .collect()
    }

    pub fn bodies(&self) -> Vec<Option<Value>> {
        self.calls.lock().unwrap().iter().map(|c| c.body.clone()).collect()
    }

    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Park requests until the returned gate is notified, once per request
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn answer(&self, call: RecordedCall) -> ClientResult<TransportResponse> {
        let key = format!("{} {}", call.method, call.endpoint);
        self.calls.lock().unwrap().push(call);

        if let Some(response) = self.routes.lock().unwrap().get(&key) {
            return Ok(response.clone());
        }
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(ClientError::Transport(message)),
            None => Ok(TransportResponse::new(404)),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn create(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        self.pass_gate().await;
        self.answer(RecordedCall {
            method: "POST",
            endpoint: endpoint.to_string(),
            body: Some(body.clone()),
            form: Vec::new(),
        })
    }

    async fn update(&self, endpoint: &str, body: &Value) -> ClientResult<TransportResponse> {
        self.pass_gate().await;
        self.answer(RecordedCall {
            method: "POST",
            endpoint: endpoint.to_string(),
            body: Some(body.clone()),
            form: Vec::new(),
        })
    }

    async fn fetch(&self, endpoint: &str) -> ClientResult<TransportResponse> {
        self.pass_gate().await;
        self.answer(RecordedCall {
            method: "GET",
            endpoint: endpoint.to_string(),
            body: None,
            form: Vec::new(),
        })
    }

    async fn delete(&self, endpoint: &str) -> ClientResult<TransportResponse> {
        self.pass_gate().await;
        self.answer(RecordedCall {
            method: "DELETE",
            endpoint: endpoint.to_string(),
            body: None,
            form: Vec::new(),
        })
    }

    async fn submit_form(
        &self,
        endpoint: &str,
        fields: &[(&str, &str)],
    ) -> ClientResult<TransportResponse> {
        self.pass_gate().await;
        self.answer(RecordedCall {
            method: "POST",
            endpoint: endpoint.to_string(),
            body: None,
            form: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    dialogs: Mutex<Vec<Dialog>>,
    closed: Mutex<usize>,
    answer: Mutex<bool>,
}

impl RecordingPresenter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answering(answer: bool) -> Arc<Self> {
        let presenter = Self::default();
        *presenter.answer.lock().unwrap() = answer;
        Arc::new(presenter)
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.dialogs.lock().unwrap().clone()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    fn present(&self, dialog: Dialog) {
        self.dialogs.lock().unwrap().push(dialog);
    }

    async fn confirm(&self, dialog: Dialog) -> bool {
        self.dialogs.lock().unwrap().push(dialog);
        *self.answer.lock().unwrap()
    }

    fn close_active(&self) {
        *self.closed.lock().unwrap() += 1;
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<CatalogEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<CatalogEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CatalogObserver for RecordingObserver {
    fn notify(&self, event: CatalogEvent) {
        self.events.lock().unwrap().push(event);
    }
}
