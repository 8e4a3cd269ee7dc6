use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use crate::query::{RemoteSource, SourceRequest, TransportError};

/// Serves canned payloads by request path and counts every dispatched read.
/// Reads wait on `gate` when the source is built with [`ScriptedSource::gated`].
pub(super) struct ScriptedSource {
    responses: Mutex<HashMap<String, Result<Value, TransportError>>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

impl ScriptedSource {
    pub(super) fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub(super) fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub(super) fn respond(self, path: &str, response: Result<Value, TransportError>) -> Self {
        self.set(path, response);
        self
    }

    pub(super) fn set(&self, path: &str, response: Result<Value, TransportError>) {
        self.responses
            .lock()
            .expect("responses mutex")
            .insert(path.to_string(), response);
    }

    pub(super) fn release(&self, reads: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(reads);
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSource for ScriptedSource {
    async fn get(&self, request: &SourceRequest) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        } else {
            tokio::task::yield_now().await;
        }

        self.responses
            .lock()
            .expect("responses mutex")
            .get(&request.path)
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    status: 404,
                    reason: "Not Found".to_string(),
                })
            })
    }
}

pub(super) fn grants_payload() -> Value {
    json!({
        "status": true,
        "message": "Grants retrieved",
        "data": {
            "items": [
                {
                    "_id": "g-1",
                    "title": "Rural Broadband Expansion",
                    "funding": "$25,000",
                    "type": "Competitive",
                    "deadline": "2025-03-10T00:00:00.000Z",
                    "location": "Iowa",
                    "fileUrls": ["https://files.example/g-1.pdf"],
                    "status": "open"
                },
                {
                    "_id": "g-2",
                    "title": "Women in Manufacturing",
                    "funding": "$8,000",
                    "type": "Rolling",
                    "location": "Nationwide",
                    "fileUrl": "https://files.example/g-2.pdf",
                    "status": "upcoming"
                }
            ],
            "total": 2,
            "page": 1,
            "limit": 10
        }
    })
}

pub(super) fn plans_payload() -> Value {
    json!({
        "status": true,
        "data": {
            "items": [
                { "_id": "p-1", "name": "Pro", "price": 29, "billingCycle": "monthly", "features": ["A"], "status": "active" },
                { "_id": "p-2", "name": "Premium", "price": 49, "billingCycle": "monthly", "features": ["A", "B"], "status": "active" },
                { "_id": "p-3", "name": "Basic", "price": 9, "billingCycle": "monthly", "features": [], "status": "active" }
            ]
        }
    })
}
