use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;
use crate::services::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub upstream: UpstreamClient,
}
