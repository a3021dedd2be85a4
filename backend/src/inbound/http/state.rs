//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CatalogueQuery, RecipeQuery, UserQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipeQuery>,
    pub users: Arc<dyn UserQuery>,
}

impl HttpState {
    /// Construct state from the read-side ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::{CatalogueService, RecipeService, UserService};
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::new(
    ///     Arc::new(CatalogueService::new(store.clone(), store.clone())),
    ///     Arc::new(RecipeService::new(store.clone(), store.clone(), store.clone())),
    ///     Arc::new(UserService::new(store.clone(), store)),
    /// );
    /// let _recipes = state.recipes.clone();
    /// ```
    pub fn new(
        catalogue: Arc<dyn CatalogueQuery>,
        recipes: Arc<dyn RecipeQuery>,
        users: Arc<dyn UserQuery>,
    ) -> Self {
        Self {
            catalogue,
            recipes,
            users,
        }
    }
}
