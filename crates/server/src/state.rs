use std::sync::Arc;
use supportdesk_core::{
    AttachmentStore, Authenticator, Config, SanitizedConfig, TicketIntake, TicketStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    ticket_store: Arc<dyn TicketStore>,
    attachments: Arc<AttachmentStore>,
    intake: TicketIntake,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        ticket_store: Arc<dyn TicketStore>,
        attachments: Arc<AttachmentStore>,
    ) -> Self {
        let intake = TicketIntake::new(Arc::clone(&ticket_store), Arc::clone(&attachments));
        Self {
            config,
            authenticator,
            ticket_store,
            attachments,
            intake,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn ticket_store(&self) -> &dyn TicketStore {
        self.ticket_store.as_ref()
    }

    pub fn attachments(&self) -> &AttachmentStore {
        self.attachments.as_ref()
    }

    pub fn intake(&self) -> &TicketIntake {
        &self.intake
    }
}
