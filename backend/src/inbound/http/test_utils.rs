//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::RecordId;
use crate::domain::ports::{MockCatalogueQuery, MockRecipeQuery, MockUserQuery};
use crate::inbound::http::state::HttpState;

/// Mocked ports behind [`HttpState`]. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub catalogue: MockCatalogueQuery,
    pub recipes: MockRecipeQuery,
    pub users: MockUserQuery,
}

impl MockPorts {
    /// Wrap the mocks in handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.catalogue),
            Arc::new(self.recipes),
            Arc::new(self.users),
        ))
    }
}

/// Parse a fixed identifier for assertions.
pub fn record_id(hex: &str) -> RecordId {
    RecordId::parse(hex).expect("valid test id")
}
