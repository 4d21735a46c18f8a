use crate::error::AppError;
use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::CollectionService;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/collection",
    tag = "collection",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取收藏一览成功", body = CollectionResponse),
        (status = 401, description = "未授权")
    )
)]
/// 收藏一览 + 完成度 (去重所持 / 现役马匹总数)
pub async fn get_collection(
    service: web::Data<CollectionService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.list(user_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn collection_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/collection").route("", web::get().to(get_collection)));
}
