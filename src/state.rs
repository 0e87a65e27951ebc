// Shared state for the route handlers
use crate::registry::ModelRegistry;

pub struct AppState {
    pub registry: ModelRegistry,
}
