use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info};
use teloxide::types::ChatId;

use crate::quiz::catalog::Catalog;
use crate::quiz::coordinator::ReportCoordinator;
use crate::quiz::navigator::Navigator;
use crate::quiz::report::{FallbackPolicy, ReportGenerator};

/// One report coordinator per chat. The navigator itself travels in the
/// dialogue state.
///
/// The map holds at most one entry per chat that has started a quiz, and
/// [`abandon`](Sessions::abandon) drops the entry when the user leaves a run.
pub struct Sessions {
    generator: Arc<dyn ReportGenerator>,
    policy: FallbackPolicy,
    deadline: Duration,
    coordinators: Mutex<HashMap<ChatId, Arc<ReportCoordinator>>>,
}

impl Sessions {
    pub fn new(generator: Arc<dyn ReportGenerator>, policy: FallbackPolicy, deadline: Duration) -> Self {
        Self {
            generator,
            policy,
            deadline,
            coordinators: Mutex::new(HashMap::new()),
        }
    }

    pub fn coordinator(&self, chat_id: ChatId) -> Arc<ReportCoordinator> {
        let mut coordinators = self
            .coordinators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        coordinators
            .entry(chat_id)
            .or_insert_with(|| {
                Arc::new(ReportCoordinator::new(
                    self.generator.clone(),
                    self.policy.clone(),
                    self.deadline,
                ))
            })
            .clone()
    }

    /// Begins a fresh run for `chat_id`: empty answers, first intro screen,
    /// and a coordinator with no report. Returns the run's generation.
    pub fn start(&self, chat_id: ChatId, catalog: &Catalog) -> (Navigator, u64) {
        let generation = self.coordinator(chat_id).reset();
        info!("Quiz started in chat {} (generation {})", chat_id.0, generation);
        (Navigator::new(catalog), generation)
    }

    /// Ends whatever run `chat_id` had. A fetch still in flight is discarded
    /// and the chat's coordinator is forgotten.
    pub fn abandon(&self, chat_id: ChatId) {
        let removed = self
            .coordinators
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&chat_id);
        if let Some(coordinator) = removed {
            coordinator.reset();
            debug!("Run abandoned in chat {}", chat_id.0);
        }
    }
}
