pub mod collection;
pub mod gacha;
pub mod social;
pub mod ticket;
pub mod webhook;

pub use collection::collection_config;
pub use gacha::gacha_config;
pub use social::social_config;
pub use ticket::ticket_config;
pub use webhook::webhook_config;

use actix_web::{HttpMessage, HttpRequest};
use uuid::Uuid;

/// 从请求扩展中获取用户ID (中间件在鉴权后注入)
pub(crate) fn get_user_id_from_request(req: &HttpRequest) -> Option<Uuid> {
    req.extensions().get::<Uuid>().copied()
}
