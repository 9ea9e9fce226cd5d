//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// This is the core abstraction over the external execution capability.
/// Each completion request is independent - no conversation state is kept
/// between calls, so a fresh instruction can be built for every retry
/// attempt without editing any shared history.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request (suspends until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    ///
    /// Plays back a scripted sequence of responses or faults, one per call,
    /// and errors once the script is exhausted.
    pub struct MockLlmClient {
        script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(script: Vec<Result<CompletionResponse, LlmError>>) -> Self {
            debug!(step_count = %script.len(), "MockLlmClient::new: called");
            Self {
                script: Mutex::new(script.into()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Convenience constructor for an all-success script
        pub fn with_responses(responses: Vec<CompletionResponse>) -> Self {
            Self::new(responses.into_iter().map(Ok).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: called");
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::InvalidResponse("No more mock responses".to_string())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn empty_request() -> CompletionRequest {
            CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                tools: vec![],
                max_tokens: 1000,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockLlmClient::with_responses(vec![
                CompletionResponse::text("Response 1"),
                CompletionResponse::text("Response 2"),
            ]);

            let resp1 = client.complete(empty_request()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(empty_request()).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_plays_back_faults() {
            let client = MockLlmClient::new(vec![
                Err(LlmError::InvalidResponse("boom".to_string())),
                Ok(CompletionResponse::text("recovered")),
            ]);

            assert!(client.complete(empty_request()).await.is_err());
            assert!(client.complete(empty_request()).await.is_ok());
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            let result = client.complete(empty_request()).await;
            assert!(result.is_err());
        }
    }
}
