//! Construct HTTP state from the configured store.

use std::sync::Arc;

use actix_web::web;
use backend::domain::ports::{CatalogueRepository, RecipeRepository, UserRepository};
use backend::domain::{CatalogueService, RecipeService, UserService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryStore;
use backend::outbound::persistence::{
    DieselCatalogueRepository, DieselRecipeRepository, DieselUserRepository,
};

use super::ServerConfig;

fn services<C, R, U>(catalogue: Arc<C>, recipes: Arc<R>, users: Arc<U>) -> HttpState
where
    C: CatalogueRepository + 'static,
    R: RecipeRepository + 'static,
    U: UserRepository + 'static,
{
    HttpState::new(
        Arc::new(CatalogueService::new(catalogue.clone(), users.clone())),
        Arc::new(RecipeService::new(recipes.clone(), catalogue, users.clone())),
        Arc::new(UserService::new(users, recipes)),
    )
}

/// Build handler state over the database when a pool is configured and over
/// the in-memory store otherwise.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match (&config.db_pool, &config.memory_store) {
        (Some(pool), _) => services(
            Arc::new(DieselCatalogueRepository::new(pool.clone())),
            Arc::new(DieselRecipeRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
        ),
        (None, Some(store)) => services(store.clone(), store.clone(), store.clone()),
        (None, None) => {
            let store = Arc::new(InMemoryStore::new());
            services(store.clone(), store.clone(), store)
        }
    };
    web::Data::new(state)
}
