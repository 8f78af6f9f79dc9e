//! In-memory [`Store`] for tests
//!
//! Records every `(query, bindings)` pair it receives and answers with
//! whatever the supplied responder returns.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::{Bindings, Record, Store};
use crate::error::{DatabaseError, Result};

type Responder = dyn Fn(&str, &Bindings) -> Result<Vec<Record>> + Send + Sync;

#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub query: String,
    pub bindings: Bindings,
}

#[derive(Clone)]
pub(crate) struct RecordingStore {
    responder: Arc<Responder>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingStore {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &Bindings) -> Result<Vec<Record>> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Store that returns no rows for anything
    pub fn empty() -> Self {
        Self::new(|_, _| Ok(Vec::new()))
    }

    /// Store whose every query fails with a database error
    pub fn failing(message: &'static str) -> Self {
        Self::new(move |_, _| Err(DatabaseError::query_failed(message).into()))
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, query: &str, bindings: &Bindings) -> Result<Vec<Record>> {
        self.calls.lock().unwrap().push(Call {
            query: query.to_string(),
            bindings: bindings.clone(),
        });
        (self.responder)(query, bindings)
    }
}

#[async_trait]
impl Store for RecordingStore {
    async fn fetch_one(&self, query: &str, bindings: &Bindings) -> Result<Option<Record>> {
        Ok(self.answer(query, bindings)?.into_iter().next())
    }

    async fn fetch_all(&self, query: &str, bindings: &Bindings) -> Result<Vec<Record>> {
        self.answer(query, bindings)
    }
}

/// Build a record from a `json!` object literal
pub(crate) fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("record() needs a JSON object, got {other}"),
    }
}
