use std::sync::Arc;

use chrono_tz::Tz;
use deskstatus_core::{
    Clock, DeskStatusConfig, DeskStatusResult, HttpCalendarSource, PresenceQuery, SystemClock,
};

use crate::messages::MessageStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub presence: PresenceQuery,
    pub messages: Arc<MessageStore>,
    pub clock: Arc<dyn Clock>,
    pub zone: Tz,
    pub retention: chrono::Duration,
    pub admin_token: Option<Arc<str>>,
}

impl AppState {
    /// Production state: HTTP feed source and the host clock.
    pub fn from_config(config: &DeskStatusConfig) -> DeskStatusResult<Self> {
        let source = Arc::new(HttpCalendarSource::new(config.fetch_timeout())?);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let presence = PresenceQuery::new(
            source,
            Arc::clone(&clock),
            config.calendar_url()?,
            config.timezone,
        );

        Ok(AppState::new(presence, clock, config))
    }

    pub fn new(presence: PresenceQuery, clock: Arc<dyn Clock>, config: &DeskStatusConfig) -> Self {
        AppState {
            presence,
            messages: Arc::new(MessageStore::new()),
            clock,
            zone: config.timezone,
            retention: config.message_retention(),
            admin_token: config.admin_token.as_deref().map(Arc::from),
        }
    }
}
