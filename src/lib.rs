pub mod command_extractor;
pub mod config;
pub mod domain;
pub mod queries;
pub mod route_handler;
pub mod services;
pub mod state;
pub mod view_repository;

use async_trait::async_trait;
use cqrs_es::{Aggregate, EventEnvelope, Query};
use tracing::debug;

/// A query that writes each committed event to the log.
pub struct EventLoggingQuery {}

#[async_trait]
impl<A> Query<A> for EventLoggingQuery
where
    A: Aggregate,
{
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<A>]) {
        for event in events {
            debug!(
                aggregate_id,
                sequence = event.sequence,
                payload = ?event.payload,
                "event committed"
            );
        }
    }
}
