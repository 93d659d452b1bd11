//! Provider test utilities
//!
//! `ScriptedProvider` replays a fixed list of outcomes and then keeps
//! succeeding, so tests control exactly which attempts fail and how.

use async_trait::async_trait;
use model_router::core::router::Sleeper;
use model_router::{Provider, ProviderCompletion, ProviderError, ProviderFactory, Request};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

type Outcome = Result<ProviderCompletion, ProviderError>;

#[derive(Debug)]
pub struct ScriptedProvider {
    model_id: String,
    script: Mutex<VecDeque<Outcome>>,
    delay: Option<Duration>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new(model_id: &str, script: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            model_id: model_id.to_string(),
            script: Mutex::new(script.into()),
            delay: None,
            calls: AtomicU32::new(0),
        })
    }

    pub fn succeeding(model_id: &str) -> Arc<Self> {
        Self::new(model_id, Vec::new())
    }

    pub fn failing(model_id: &str, error: ProviderError) -> Arc<Self> {
        Self::new(model_id, vec![Err(error); 100])
    }

    /// Succeeds only after `delay`
    pub fn slow(model_id: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            model_id: model_id.to_string(),
            script: Mutex::new(VecDeque::new()),
            delay: Some(delay),
            calls: AtomicU32::new(0),
        })
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &Request) -> Result<ProviderCompletion, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.script.lock().pop_front();
        match next {
            Some(outcome) => outcome,
            None => Ok(ProviderCompletion::new(
                format!("[{}] {}", self.model_id, request.prompt()),
                0.002,
                150,
                64,
            )),
        }
    }
}

/// Factory serving the given providers by model id; other models fail to build
pub fn scripted_factory(providers: &[Arc<ScriptedProvider>]) -> ProviderFactory {
    let by_model: HashMap<String, Arc<ScriptedProvider>> = providers
        .iter()
        .map(|p| (p.model_id().to_string(), Arc::clone(p)))
        .collect();

    ProviderFactory::default()
        .with_provider(".*", "scripted", false, move |spec| {
            by_model
                .get(&spec.model_id)
                .map(|p| Arc::clone(p) as Arc<dyn Provider>)
                .ok_or_else(|| ProviderError::model_not_found("scripted", spec.model_id.clone()))
        })
        .expect("valid pattern")
}

/// Records requested delays without waiting
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().push(duration);
    }
}
