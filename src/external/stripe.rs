use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use stripe::{Event, Webhook};

#[derive(Clone)]
pub struct StripeService {
    config: StripeConfig,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self { config }
    }

    /// 校验 webhook 签名并解析事件
    pub fn verify_webhook_signature(&self, payload: &str, signature: &str) -> AppResult<Event> {
        Webhook::construct_event(payload, signature, &self.config.webhook_secret)
            .map_err(|e| AppError::AuthError(format!("Webhook signature verification failed: {e}")))
    }
}
