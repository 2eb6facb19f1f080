use crate::catalog::Catalog;
use crate::upstream::Upstream;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub upstream: Upstream,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(upstream: Upstream, catalog: Catalog) -> Self {
        Self {
            upstream,
            catalog: Arc::new(catalog),
        }
    }
}
