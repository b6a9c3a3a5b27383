//! Scriptable model capability for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use pull2sheet_config::ExtractionConfig;
use pull2sheet_protocols::{
    Availability, FieldDescriptor, LanguageModel, MemoryPanelSink, ModelError, ModelSession,
    PanelEvent, Prompt, SessionOptions,
};

use crate::context::PassContext;

/// What a mock session answers to one prompt.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
    Hang,
    After(Duration, String),
}

impl Reply {
    pub fn text(value: &str) -> Self {
        Reply::Text(value.to_string())
    }
}

/// How `create()` behaves.
#[derive(Debug, Clone)]
pub enum Creation {
    Ready,
    RejectModality,
    Fail,
    Hang,
    /// The session arrives only after the delay.
    Late(Duration),
}

pub type Responder = Arc<dyn Fn(&Prompt) -> Reply + Send + Sync>;

#[derive(Debug, Default)]
pub struct Stats {
    pub created: AtomicUsize,
    pub destroyed: AtomicUsize,
    pub prompts: Mutex<Vec<Prompt>>,
}

impl Stats {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn prompt_texts(&self) -> Vec<String> {
        self.prompts.lock().iter().map(Prompt::text_content).collect()
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

pub struct MockModel {
    availability: Availability,
    creation: Creation,
    responder: Responder,
    pub stats: Arc<Stats>,
}

impl MockModel {
    pub fn new(responder: impl Fn(&Prompt) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            availability: Availability::Available,
            creation: Creation::Ready,
            responder: Arc::new(responder),
            stats: Arc::new(Stats::default()),
        }
    }

    /// Answer every field prompt by looking up the quoted field name.
    pub fn answering(answers: &[(&str, &str)]) -> Self {
        let answers: Vec<(String, String)> = answers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self::new(move |prompt| {
            let text = prompt.text_content();
            answers
                .iter()
                .find(|(name, _)| text.contains(&format!("Extract the value for \"{}\"", name)))
                .map(|(_, value)| Reply::Text(value.clone()))
                .unwrap_or(Reply::text("N/A"))
        })
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_creation(mut self, creation: Creation) -> Self {
        self.creation = creation;
        self
    }

    fn session(&self) -> Box<dyn ModelSession> {
        self.stats.created.fetch_add(1, Ordering::SeqCst);
        Box::new(MockSession {
            responder: self.responder.clone(),
            stats: self.stats.clone(),
            closed: Mutex::new(false),
        })
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    fn id(&self) -> &str {
        "mock"
    }

    async fn availability(&self) -> Result<Availability, ModelError> {
        Ok(self.availability)
    }

    async fn create(&self, options: SessionOptions) -> Result<Box<dyn ModelSession>, ModelError> {
        match &self.creation {
            Creation::Ready => Ok(self.session()),
            Creation::RejectModality if options.wants_images() => Err(
                ModelError::UnsupportedModality("image input not enabled".to_string()),
            ),
            Creation::RejectModality => Ok(self.session()),
            Creation::Fail => Err(ModelError::Unavailable("backend offline".to_string())),
            Creation::Hang => std::future::pending().await,
            Creation::Late(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(self.session())
            }
        }
    }
}

pub struct MockSession {
    responder: Responder,
    stats: Arc<Stats>,
    closed: Mutex<bool>,
}

#[async_trait]
impl ModelSession for MockSession {
    async fn prompt(&self, prompt: Prompt) -> Result<String, ModelError> {
        if *self.closed.lock() {
            return Err(ModelError::SessionClosed);
        }
        let reply = (self.responder)(&prompt);
        self.stats.prompts.lock().push(prompt);
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail => Err(ModelError::PromptFailed("model crashed".to_string())),
            Reply::Hang => std::future::pending().await,
            Reply::After(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }

    async fn destroy(&self) {
        *self.closed.lock() = true;
        self.stats.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn fields(names: &[&str]) -> Vec<FieldDescriptor> {
    names.iter().map(|n| FieldDescriptor::new(*n)).collect()
}

pub fn context(config: ExtractionConfig) -> (PassContext, Arc<MemoryPanelSink>) {
    let panel = Arc::new(MemoryPanelSink::new());
    (PassContext::new(1, panel.clone(), Arc::new(config)), panel)
}

/// FILL_FIELDS / FILL_AND_ADD payloads in emission order, as wire maps.
pub fn deliveries(panel: &MemoryPanelSink) -> Vec<(&'static str, Vec<(String, String)>)> {
    panel
        .events()
        .into_iter()
        .filter_map(|event| match event {
            PanelEvent::FillFields { data } => Some(("FILL_FIELDS", wire(&data))),
            PanelEvent::FillAndAdd { data } => Some(("FILL_AND_ADD", wire(&data))),
            _ => None,
        })
        .collect()
}

fn wire(data: &pull2sheet_protocols::ExtractionResult) -> Vec<(String, String)> {
    data.iter()
        .map(|(name, value)| (name.to_string(), value.as_wire().to_string()))
        .collect()
}
