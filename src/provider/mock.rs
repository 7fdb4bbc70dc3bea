//! Fake providers with canned replies and call counters.

use crate::provider::{
    CompletionRequest, LanguageModel, ProviderError, SpeechToText, TranscriptionRequest,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub enum MockReply {
    Text(String),
    ApiError(String),
    InvalidResponse(String),
    RequestError(String),
    Panic(String),
}

impl MockReply {
    fn to_result(&self) -> Result<String, ProviderError> {
        match self {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::ApiError(msg) => Err(ProviderError::Api(msg.clone())),
            MockReply::InvalidResponse(msg) => Err(ProviderError::InvalidResponse(msg.clone())),
            MockReply::RequestError(msg) => Err(ProviderError::Request(msg.clone())),
            MockReply::Panic(msg) => panic!("{}", msg),
        }
    }
}

pub struct MockSpeechToText {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<TranscriptionRequest>>,
}

impl MockSpeechToText {
    pub fn replying(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::replying(MockReply::Text(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<TranscriptionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, request: TranscriptionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        self.reply.to_result()
    }
}

pub struct MockLanguageModel {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockLanguageModel {
    pub fn replying(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::replying(MockReply::Text(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.reply.to_result()
    }
}
