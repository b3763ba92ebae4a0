// Test mocks for the newsletter pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockProvider (Provider): canned JSON or a failure, optional delay
// - ScriptedGenerator (TextGenerator): records calls, returns canned text
//
// Plus record helpers for building provider payloads.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::agents::{AgentPersona, AgentTask, TextGenerator};
use crate::research::{Provider, ProviderKind, ProviderQuery};

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

enum Reply {
    Value(Value),
    Fail(String),
}

/// Provider with a fixed reply. `calls()` counts invocations, including
/// ones abandoned mid-delay.
pub struct MockProvider {
    kind: ProviderKind,
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_query: Mutex<Option<ProviderQuery>>,
}

impl MockProvider {
    fn new(kind: ProviderKind, reply: Reply) -> Self {
        Self {
            kind,
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    /// Returns `items` as a JSON array.
    pub fn returning(kind: ProviderKind, items: Vec<Value>) -> Self {
        Self::new(kind, Reply::Value(Value::Array(items)))
    }

    pub fn failing(kind: ProviderKind, message: &str) -> Self {
        Self::new(kind, Reply::Fail(message.to_string()))
    }

    /// Succeeds, but with something other than an array.
    pub fn non_sequence(kind: ProviderKind, value: Value) -> Self {
        Self::new(kind, Reply::Value(value))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn shared(self) -> Arc<dyn Provider> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<ProviderQuery> {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, query: &ProviderQuery) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Reply::Value(v) => Ok(v.clone()),
            Reply::Fail(msg) => bail!("{msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ScriptedGenerator
// ---------------------------------------------------------------------------

/// A recorded generator call.
#[derive(Debug, Clone)]
pub struct GeneratorCall {
    pub persona: AgentPersona,
    pub task: AgentTask,
}

/// Returns a canned response per persona role, or echoes the task context
/// when no response is scripted for that role.
#[derive(Default)]
pub struct ScriptedGenerator {
    responses: HashMap<String, String>,
    failures: HashMap<String, String>,
    calls: Mutex<Vec<GeneratorCall>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, role: &str, text: &str) -> Self {
        self.responses.insert(role.to_string(), text.to_string());
        self
    }

    pub fn fail(mut self, role: &str, message: &str) -> Self {
        self.failures.insert(role.to_string(), message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, persona: &AgentPersona, task: &AgentTask) -> Result<String> {
        self.calls.lock().unwrap().push(GeneratorCall {
            persona: persona.clone(),
            task: task.clone(),
        });
        if let Some(msg) = self.failures.get(&persona.role) {
            bail!("{msg}");
        }
        Ok(self
            .responses
            .get(&persona.role)
            .cloned()
            .unwrap_or_else(|| task.context.clone()))
    }
}

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

/// A linked item, the shape news/web/video providers return.
pub fn linked_item(title: &str, url: &str, description: &str) -> Value {
    json!({ "title": title, "url": url, "description": description })
}

/// A post with body text, the shape community/social providers return.
pub fn post_item(text: &str, url: &str, author: &str) -> Value {
    json!({ "text": text, "url": url, "author": author })
}
