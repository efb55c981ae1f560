//! Gallery - User Error Queue
//!
//! Messages waiting to be shown to the user, oldest first.

use std::collections::VecDeque;

/// Queue of user-facing error messages
#[derive(Debug, Default)]
pub struct ErrorQueue {
    messages: VecDeque<String>,
}

impl ErrorQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_error_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("User error: {}", message);
        self.messages.push_back(message);
    }

    /// Next message to display
    pub fn pop(&mut self) -> Option<String> {
        self.messages.pop_front()
    }

    pub fn peek(&self) -> Option<&str> {
        self.messages.front().map(String::as_str)
    }

    /// Take every pending message
    pub fn drain(&mut self) -> Vec<String> {
        self.messages.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
