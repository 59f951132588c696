use std::sync::Arc;

use crate::domain::ports::inbound::ContactService;

#[derive(Clone)]
pub struct AppState {
    pub contact_service: Arc<dyn ContactService>,
}

impl AppState {
    pub fn new(contact_service: Arc<dyn ContactService>) -> Self {
        Self { contact_service }
    }
}
