//! crates/wellness_core/src/reply.rs
//!
//! The shape of a remote reply and the single function that turns it into text.

use crate::ports::PortResult;
use futures::{Stream, StreamExt};
use std::fmt;
use std::pin::Pin;
use std::str::FromStr;
use tracing::debug;

/// One incremental piece of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The textual content, when the remote chunk carried any.
    pub text: Option<String>,
    /// A printable rendering of the whole chunk.
    pub raw: String,
}

impl Fragment {
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: text.clone(),
            text: Some(text),
        }
    }

    pub fn without_text(raw: impl Into<String>) -> Self {
        Self {
            text: None,
            raw: raw.into(),
        }
    }

    fn contribution(&self, fallback: FragmentFallback) -> Option<&str> {
        match (&self.text, fallback) {
            (Some(text), _) => Some(text),
            (None, FragmentFallback::Stringify) => Some(&self.raw),
            (None, FragmentFallback::Skip) => None,
        }
    }
}

pub type FragmentStream = Pin<Box<dyn Stream<Item = PortResult<Fragment>> + Send>>;

/// What a fragment without text adds to the accumulated reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentFallback {
    /// Contributes nothing.
    #[default]
    Skip,
    /// Contributes the fragment's raw rendering.
    ///
    /// Only the local transcript sees the raw text. A remote dialogue that
    /// keeps its own history records just the extracted text.
    Stringify,
}

impl FromStr for FragmentFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(FragmentFallback::Skip),
            "stringify" => Ok(FragmentFallback::Stringify),
            other => Err(format!("'{}' is not one of: skip, stringify", other)),
        }
    }
}

/// A remote reply, delivered either whole or as a stream of fragments.
pub enum Reply {
    Unitary(String),
    Fragmented(FragmentStream),
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Unitary(text) => f.debug_tuple("Unitary").field(text).finish(),
            Reply::Fragmented(_) => f.write_str("Fragmented(..)"),
        }
    }
}

impl Reply {
    /// Wraps an already collected list of fragments.
    pub fn from_fragments(fragments: Vec<Fragment>) -> Self {
        Reply::Fragmented(Box::pin(futures::stream::iter(
            fragments.into_iter().map(Ok),
        )))
    }

    /// Drains the reply into a single string, fragments concatenated in arrival order.
    ///
    /// An error yielded by the stream aborts accumulation and is returned as is.
    pub async fn accumulate(self, fallback: FragmentFallback) -> PortResult<String> {
        match self {
            Reply::Unitary(text) => Ok(text),
            Reply::Fragmented(mut fragments) => {
                let mut reply = String::new();
                let mut count = 0usize;
                while let Some(fragment) = fragments.next().await {
                    let fragment = fragment?;
                    count += 1;
                    match fragment.contribution(fallback) {
                        Some(text) => reply.push_str(text),
                        None => debug!("Skipping fragment without text: {}", fragment.raw),
                    }
                }
                debug!("Accumulated {} fragments into {} bytes.", count, reply.len());
                Ok(reply)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortError;

    #[tokio::test]
    async fn fragments_concatenate_in_order() {
        let reply = Reply::from_fragments(vec![
            Fragment::text("Hello, "),
            Fragment::text("world"),
            Fragment::text("!"),
        ]);
        let text = reply.accumulate(FragmentFallback::Skip).await.unwrap();
        assert_eq!(text, "Hello, world!");
    }

    #[tokio::test]
    async fn unitary_reply_is_returned_unchanged() {
        let reply = Reply::Unitary("  Take a slow breath.\n".to_string());
        let text = reply.accumulate(FragmentFallback::Stringify).await.unwrap();
        assert_eq!(text, "  Take a slow breath.\n");
    }

    #[tokio::test]
    async fn textless_fragments_follow_fallback_policy() {
        let fragments = vec![
            Fragment::without_text("{finish_reason: stop}"),
            Fragment::text("ok"),
        ];

        let skipped = Reply::from_fragments(fragments.clone())
            .accumulate(FragmentFallback::Skip)
            .await
            .unwrap();
        assert_eq!(skipped, "ok");

        let stringified = Reply::from_fragments(fragments)
            .accumulate(FragmentFallback::Stringify)
            .await
            .unwrap();
        assert_eq!(stringified, "{finish_reason: stop}ok");
    }

    #[tokio::test]
    async fn empty_stream_yields_empty_string() {
        let text = Reply::from_fragments(Vec::new())
            .accumulate(FragmentFallback::Skip)
            .await
            .unwrap();
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn stream_error_aborts_accumulation() {
        let stream = futures::stream::iter(vec![
            Ok(Fragment::text("partial")),
            Err(PortError::Remote("connection reset".to_string())),
        ]);
        let result = Reply::Fragmented(Box::pin(stream))
            .accumulate(FragmentFallback::Skip)
            .await;
        assert!(matches!(result, Err(PortError::Remote(_))));
    }

    #[test]
    fn fallback_parses_from_config_values() {
        assert_eq!("skip".parse::<FragmentFallback>(), Ok(FragmentFallback::Skip));
        assert_eq!(
            "Stringify".parse::<FragmentFallback>(),
            Ok(FragmentFallback::Stringify)
        );
        assert!("drop".parse::<FragmentFallback>().is_err());
    }
}
