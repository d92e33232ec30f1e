#[cfg(test)]
pub mod fake;
pub mod http_api;

use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> Result<BackendBox> {
        let url = Config::get(ConfigKey::ApiUrl);
        if url.trim().is_empty() {
            bail!("No API URL configured, set --api-url or DOCCHAT_API_URL");
        }

        return Ok(Arc::new(http_api::HttpApi::with_url(url)));
    }
}
