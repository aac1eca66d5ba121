use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cqrs_es::{EventEnvelope, Query, View};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::booking::BookingFlow;
use crate::queries::BookingFormView;

/// Keeps one materialized [`BookingFormView`] per booking session, in
/// process memory. A session's view lives exactly as long as the process:
/// drafts are not persisted, and abandoning the flow abandons the view.
#[derive(Clone, Default)]
pub struct SessionViewRepository {
    views: Arc<RwLock<HashMap<String, BookingFormView>>>,
}

impl SessionViewRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a session's view by ID, if any events have been committed for it.
    pub async fn load(&self, session_id: &Uuid) -> Option<BookingFormView> {
        self.views
            .read()
            .await
            .get(&session_id.to_string())
            .cloned()
    }
}

#[async_trait]
impl Query<BookingFlow> for SessionViewRepository {
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<BookingFlow>]) {
        let mut views = self.views.write().await;
        let view = views.entry(aggregate_id.to_string()).or_default();
        for event in events {
            view.update(event);
        }
    }
}
