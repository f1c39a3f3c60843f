//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use warta::{
    CaptionEngine, ChatOptions, ChatProvider, ChatResponse, Config, Message, ReportSharingData,
    Result, Usage, WartaError,
};

pub const PREMIUM: &str = "test/premium";
pub const FREE: &str = "test/free";

/// What a scripted model does when called.
#[derive(Clone)]
pub enum Behavior {
    /// Respond with this raw content.
    Reply(String),
    /// Fail with the produced error.
    Fail(fn() -> WartaError),
    /// Never respond.
    Hang,
}

pub fn reply_json(caption: &str, hashtags: &[&str]) -> Behavior {
    Behavior::Reply(
        serde_json::json!({ "caption": caption, "hashtags": hashtags }).to_string(),
    )
}

/// Mock provider driven by a per-model script, recording every call.
pub struct ScriptedProvider {
    script: Mutex<HashMap<String, Vec<Behavior>>>,
    calls: Mutex<Vec<String>>,
    dropped_while_pending: Arc<AtomicBool>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            dropped_while_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Queue behaviours for a model; the last one repeats once the queue is drained.
    pub fn on(self, model: &str, behaviors: Vec<Behavior>) -> Self {
        self.script
            .lock()
            .unwrap()
            .insert(model.to_string(), behaviors);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, model: &str) -> usize {
        self.calls().iter().filter(|m| *m == model).count()
    }

    /// Whether a hanging call was dropped before completing.
    pub fn hung_call_was_cancelled(&self) -> bool {
        self.dropped_while_pending.load(Ordering::SeqCst)
    }

    fn next(&self, model: &str) -> Behavior {
        let mut script = self.script.lock().unwrap();
        let queue = script
            .get_mut(model)
            .unwrap_or_else(|| panic!("no script for {model}"));
        if queue.len() > 1 {
            queue.remove(0)
        } else {
            queue[0].clone()
        }
    }
}

struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, messages: &[Message], options: &ChatOptions) -> Result<ChatResponse> {
        assert_eq!(messages.len(), 2);
        self.calls.lock().unwrap().push(options.model.clone());
        match self.next(&options.model) {
            Behavior::Reply(content) => Ok(ChatResponse {
                content,
                usage: Some(Usage {
                    prompt_tokens: 120,
                    completion_tokens: 40,
                    total_tokens: 160,
                }),
                model: Some(options.model.clone()),
            }),
            Behavior::Fail(make) => Err(make()),
            Behavior::Hang => {
                let _guard = PendingGuard(self.dropped_while_pending.clone());
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.premium_model = PREMIUM.to_string();
    config.provider.free_model = FREE.to_string();
    config
}

pub fn engine_with(provider: Arc<ScriptedProvider>) -> CaptionEngine {
    CaptionEngine::builder()
        .config(test_config())
        .provider(provider)
        .build()
        .expect("engine should build with an explicit provider")
}

pub fn sudirman() -> ReportSharingData {
    ReportSharingData {
        id: "rpt-001".into(),
        category: "berlubang".into(),
        street: "Jl. Sudirman".into(),
        district: "Menteng".into(),
        city: "Jakarta Pusat".into(),
        province: "DKI Jakarta".into(),
        created_at: Utc.with_ymd_and_hms(2026, 10, 19, 2, 0, 0).unwrap(),
        share_count: 7,
    }
}
