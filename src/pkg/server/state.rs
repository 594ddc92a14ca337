use std::sync::Arc;

use ai::clients::openai::Client as AIClient;
use standard_error::StandardError;

use crate::{
    conf::settings, pkg::internal::adaptors::analyses::store::Store, prelude::Result,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub ai_client: Arc<AIClient>,
}

impl AppState {
    pub async fn new() -> Result<AppState> {
        let ai = AIClient::from_url(&settings.ai_key, &settings.ai_endpoint)
            .map_err(|_| StandardError::new("ERR-AI-000"))?;
        let store = Store::connect()?;
        store.init().await?;
        Ok(AppState {
            store,
            ai_client: Arc::new(ai),
        })
    }
}
