use crate::error::AppError;
use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::{LoginBonusService, TicketService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/tickets",
    tag = "ticket",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取奖券余额一览成功", body = [TicketBalanceResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 全奖券种类 + 当前用户余额 (无记录按 0)
pub async fn get_tickets(
    service: web::Data<TicketService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.list_balances(user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/tickets/bonus",
    tag = "ticket",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取登录奖励状态成功", body = BonusStatusResponse),
        (status = 401, description = "未授权")
    )
)]
/// 本窗口的登录奖励领取状态与下次重置时刻
pub async fn get_bonus_status(
    service: web::Data<LoginBonusService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.status(user_id).await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/tickets/bonus",
    tag = "ticket",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "领取成功", body = BonusClaimResponse),
        (status = 400, description = "本窗口已领取 (附 next_reset_at)"),
        (status = 401, description = "未授权")
    )
)]
/// 领取登录奖励:
/// 1. 计算领取窗口 (基准时区重置时刻切窗)
/// 2. 窗口内最多一次, 并发由唯一约束裁决
/// 3. 加算免费奖券并返回新余额
pub async fn claim_bonus(
    service: web::Data<LoginBonusService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.claim(user_id).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn ticket_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tickets")
            .route("", web::get().to(get_tickets))
            .route("/bonus", web::get().to(get_bonus_status))
            .route("/bonus", web::post().to(claim_bonus)),
    );
}
