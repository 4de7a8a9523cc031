//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{RedirectResolver, RefreshService};
use crate::domain::data_source::DataSource;
use crate::domain::mapping::MappingStore;
use crate::domain::update_worker::UpdateSender;
use crate::web::ResponseOptions;

/// State handed to every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MappingStore>,
    pub resolver: RedirectResolver,
    pub refresh_service: Arc<RefreshService>,
    pub updates: UpdateSender,
    pub responses: Arc<ResponseOptions>,
}

impl AppState {
    pub fn new(
        refresh_service: Arc<RefreshService>,
        resolver: RedirectResolver,
        updates: UpdateSender,
        responses: ResponseOptions,
    ) -> Self {
        Self {
            store: refresh_service.store().clone(),
            resolver,
            refresh_service,
            updates,
            responses: Arc::new(responses),
        }
    }

    pub fn source(&self) -> &Arc<dyn DataSource> {
        self.refresh_service.source()
    }
}
