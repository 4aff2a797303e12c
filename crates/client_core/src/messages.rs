use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Receives human readable status lines from the data access layer.
pub trait MessageSink: Send + Sync {
    fn add(&self, message: String);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// In-process message log: keeps history and fans new entries out to subscribers.
pub struct MessageService {
    history: Mutex<Vec<StatusMessage>>,
    events: broadcast::Sender<StatusMessage>,
}

impl MessageService {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            history: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock()
            .iter()
            .map(|entry| entry.text.clone())
            .collect()
    }

    pub fn entries(&self) -> Vec<StatusMessage> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusMessage> {
        self.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<StatusMessage>> {
        // A panicking subscriber cannot leave the log half-written.
        self.history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MessageService {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for MessageService {
    fn add(&self, message: String) {
        let entry = StatusMessage {
            at: Utc::now(),
            text: message,
        };
        self.lock().push(entry.clone());
        // No subscribers is fine; history still has it.
        let _ = self.events.send(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_messages_in_order_until_cleared() {
        let service = MessageService::new();
        service.add("HeroService: fetched heroes".to_string());
        service.add("HeroService: fetched hero id=11".to_string());

        assert_eq!(
            service.messages(),
            vec![
                "HeroService: fetched heroes".to_string(),
                "HeroService: fetched hero id=11".to_string(),
            ]
        );

        service.clear();
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_new_messages() {
        let service = MessageService::new();
        let mut rx = service.subscribe();

        service.add("HeroService: deleted hero id=12".to_string());

        let entry = rx.recv().await.expect("message");
        assert_eq!(entry.text, "HeroService: deleted hero id=12");
        assert_eq!(service.len(), 1);
    }
}
