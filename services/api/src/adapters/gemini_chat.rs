//! services/api/src/adapters/gemini_chat.rs
//!
//! This module contains the adapter for the wellness chat LLM.
//! It implements the `ConversationService` port from the `core` crate against
//! Gemini's OpenAI-compatible chat completions endpoint.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
        CreateChatCompletionStreamResponse,
    },
    Client,
};
use async_stream::try_stream;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use wellness_core::{
    ports::{ConversationService, DialogueContext, PortError, PortResult},
    reply::{Fragment, FragmentStream, Reply},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ConversationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct GeminiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    streaming: bool,
}

impl GeminiChatAdapter {
    /// Creates a new `GeminiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, streaming: bool) -> Self {
        Self {
            client,
            model,
            streaming,
        }
    }

    /// Configures a client for `api_base` authenticated with `api_key`.
    pub fn from_credential(api_key: &str, api_base: &str, model: String, streaming: bool) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self::new(Client::with_config(config), model, streaming)
    }
}

#[async_trait]
impl ConversationService for GeminiChatAdapter {
    async fn start_dialogue(&self) -> PortResult<Box<dyn DialogueContext>> {
        info!("Starting a new {} dialogue (streaming: {}).", self.model, self.streaming);
        Ok(Box::new(GeminiDialogue {
            client: self.client.clone(),
            model: self.model.clone(),
            streaming: self.streaming,
            history: Arc::new(Mutex::new(Vec::new())),
        }))
    }
}

//=========================================================================================
// One Running Dialogue
//=========================================================================================

/// A conversation whose history is replayed to the API on every request.
///
/// An exchange is added to the history only once its reply has been fully
/// received, so a failed call leaves the conversation as it was.
pub struct GeminiDialogue {
    client: Client<OpenAIConfig>,
    model: String,
    streaming: bool,
    history: Arc<Mutex<Vec<ChatCompletionRequestMessage>>>,
}

#[async_trait]
impl DialogueContext for GeminiDialogue {
    async fn send(&mut self, text: &str) -> PortResult<Reply> {
        let user_message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into();

        let mut messages = self.history.lock().await.clone();
        messages.push(user_message.clone());
        debug!("Sending message with {} turns of history.", messages.len() - 1);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !self.streaming {
            let response = self
                .client
                .chat()
                .create(request)
                .await
                .map_err(|e: OpenAIError| PortError::Remote(e.to_string()))?;

            let content = response
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default();

            let assistant_message = assistant_message(&content)?;
            let mut history = self.history.lock().await;
            history.push(user_message);
            history.push(assistant_message);
            return Ok(Reply::Unitary(content));
        }

        let chunks = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e: OpenAIError| PortError::Remote(e.to_string()))?;

        let fragments: FragmentStream = Box::pin(commit_on_completion(
            chunks,
            self.history.clone(),
            user_message,
        ));
        Ok(Reply::Fragmented(fragments))
    }
}

/// Re-yields the streamed chunks as fragments and records the exchange in
/// `history` once the stream is exhausted.
fn commit_on_completion(
    mut chunks: impl Stream<Item = Result<CreateChatCompletionStreamResponse, OpenAIError>>
        + Send
        + Unpin
        + 'static,
    history: Arc<Mutex<Vec<ChatCompletionRequestMessage>>>,
    user_message: ChatCompletionRequestMessage,
) -> impl Stream<Item = PortResult<Fragment>> + Send {
    try_stream! {
        let mut reply = String::new();
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| PortError::Remote(e.to_string()))?;
            let fragment = fragment_from_chunk(&chunk);
            if let Some(text) = &fragment.text {
                reply.push_str(text);
            }
            yield fragment;
        }

        let assistant_message = assistant_message(&reply)?;
        let mut history = history.lock().await;
        history.push(user_message);
        history.push(assistant_message);
        debug!("Dialogue history now holds {} messages.", history.len());
    }
}

fn assistant_message(content: &str) -> PortResult<ChatCompletionRequestMessage> {
    Ok(ChatCompletionRequestAssistantMessageArgs::default()
        .content(content)
        .build()
        .map_err(|e| PortError::Unexpected(e.to_string()))?
        .into())
}

/// Extracts the text carried by a streamed chunk.
///
/// Chunks that only carry a role, a finish reason or usage have no text.
fn fragment_from_chunk(chunk: &CreateChatCompletionStreamResponse) -> Fragment {
    let mut text: Option<String> = None;
    for choice in &chunk.choices {
        if let Some(content) = &choice.delta.content {
            text.get_or_insert_with(String::new).push_str(content);
        }
    }

    match text {
        Some(text) => Fragment::text(text),
        None => Fragment::without_text(format!("{:?}", chunk)),
    }
}
