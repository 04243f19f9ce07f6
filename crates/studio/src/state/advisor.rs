use shared::{AdvisorRequest, AdvisorResponse, ProjectSnapshot};
use tokio::sync::oneshot;

use crate::advisor::{AdvisorClient, AdvisorError};

/// Role of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
}

/// Advisor chat: message log plus at most one request in flight
#[derive(Default)]
pub struct AdvisorState {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub is_loading: bool,
    pub last_failed_input: Option<String>,
    in_flight: Option<String>,
    pending: Option<oneshot::Receiver<Result<AdvisorResponse, AdvisorError>>>,
}

impl AdvisorState {
    /// Turn the current input into a request about `snapshot`.
    ///
    /// Returns `None` for blank input or while another request is in flight.
    pub fn send_message(&mut self, snapshot: ProjectSnapshot) -> Option<AdvisorRequest> {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.is_loading {
            return None;
        }
        self.input.clear();
        Some(self.start_request(text, snapshot))
    }

    /// Re-ask the last failed question against a fresh snapshot
    pub fn retry(&mut self, snapshot: ProjectSnapshot) -> Option<AdvisorRequest> {
        if self.is_loading {
            return None;
        }
        let text = self.last_failed_input.take()?;
        Some(self.start_request(text, snapshot))
    }

    fn start_request(&mut self, text: String, snapshot: ProjectSnapshot) -> AdvisorRequest {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.clone(),
            is_error: false,
        });
        self.is_loading = true;
        self.in_flight = Some(text.clone());
        AdvisorRequest {
            message: text,
            snapshot,
        }
    }

    /// Record the outcome of the request in flight
    pub fn receive(&mut self, result: Result<AdvisorResponse, String>) {
        self.is_loading = false;
        let asked = self.in_flight.take();
        match result {
            Ok(response) => self.messages.push(ChatMessage {
                role: ChatRole::Assistant,
                text: response.text,
                is_error: false,
            }),
            Err(error) => {
                tracing::error!("advisor request failed: {error}");
                self.last_failed_input = asked;
                self.messages.push(ChatMessage {
                    role: ChatRole::Assistant,
                    text: error,
                    is_error: true,
                });
            }
        }
    }

    /// Send the current input on the given runtime; poll with [`Self::poll_responses`]
    pub fn dispatch(
        &mut self,
        runtime: &tokio::runtime::Handle,
        client: &AdvisorClient,
        snapshot: ProjectSnapshot,
    ) -> bool {
        let Some(request) = self.send_message(snapshot) else {
            return false;
        };
        let (tx, rx) = oneshot::channel();
        let client = client.clone();
        runtime.spawn(async move {
            let _ = tx.send(client.ask(&request).await);
        });
        self.pending = Some(rx);
        true
    }

    /// Collect a finished dispatched request; returns true when one arrived
    pub fn poll_responses(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(oneshot::error::TryRecvError::Empty) => return false,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err("Advisor request was dropped".to_string())
            }
        };
        self.pending = None;
        self.receive(result);
        true
    }

    /// Empty the log and abandon any request in flight
    pub fn clear(&mut self) {
        self.messages.clear();
        self.input.clear();
        self.last_failed_input = None;
        self.is_loading = false;
        self.in_flight = None;
        self.pending = None;
    }
}
