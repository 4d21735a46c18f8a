use crate::error::AppError;
use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::{FriendshipService, GiftService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/social/search",
    tag = "social",
    params(
        ("q" = String, Query, description = "email 完全一致或显示名部分一致")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "用户检索成功", body = [UserSearchResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 用户检索 (转赠/好友申请的对象探索用)
pub async fn search_users(
    service: web::Data<FriendshipService>,
    query: web::Query<UserSearchQuery>,
) -> Result<HttpResponse> {
    match service.search(&query.q).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/social/request",
    tag = "social",
    request_body = FriendRequestPayload,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "好友申请成功"),
        (status = 400, description = "已申请或参数不正"),
        (status = 401, description = "未授权")
    )
)]
/// 发起好友申请 (每对用户最多一条关系记录)
pub async fn send_friend_request(
    service: web::Data<FriendshipService>,
    req: HttpRequest,
    body: web::Json<FriendRequestPayload>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.request(user_id, body.to_user_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": { "ok": true } }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/social/respond",
    tag = "social",
    request_body = RespondFriendRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "应答成功", body = RespondFriendResponse),
        (status = 400, description = "已处理或参数不正"),
        (status = 403, description = "非被申请方"),
        (status = 401, description = "未授权")
    )
)]
/// 应答好友申请 (仅被申请方, 仅 pending)
pub async fn respond_friend_request(
    service: web::Data<FriendshipService>,
    req: HttpRequest,
    body: web::Json<RespondFriendRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.respond(user_id, body.id, body.action).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": RespondFriendResponse { status: updated.status }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/social/friends",
    tag = "social",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "好友一览成功", body = [FriendResponse]),
        (status = 401, description = "未授权")
    )
)]
/// 好友/申请一览
pub async fn list_friends(
    service: web::Data<FriendshipService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.list(user_id).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/social/gift",
    tag = "social",
    request_body = SendGiftRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "转赠发送成功"),
        (status = 400, description = "余额/所持不足或参数不正"),
        (status = 401, description = "未授权")
    )
)]
/// 发送转赠:
/// 1. 条件扣减发送方 (不足即失败)
/// 2. 加算接收方 (发送时即转移)
/// 3. 记录 status=sent
pub async fn send_gift(
    service: web::Data<GiftService>,
    req: HttpRequest,
    body: web::Json<SendGiftRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.send(user_id, &body.into_inner()).await {
        Ok(_) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": { "ok": true } }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/social/gifts",
    tag = "social",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "转赠一览成功", body = GiftListResponse),
        (status = 401, description = "未授权")
    )
)]
/// 收发分组的转赠一览 (新到旧)
pub async fn list_gifts(service: web::Data<GiftService>, req: HttpRequest) -> Result<HttpResponse> {
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

#[utoipa::path(
    post,
    path = "/social/gift/respond",
    tag = "social",
    request_body = RespondGiftRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "应答成功", body = RespondGiftResponse),
        (status = 400, description = "已处理"),
        (status = 403, description = "非接收方"),
        (status = 401, description = "未授权")
    )
)]
/// 应答转赠 (仅接收方, 仅 sent; decline 时回滚转移)
pub async fn respond_gift(
    service: web::Data<GiftService>,
    req: HttpRequest,
    body: web::Json<RespondGiftRequest>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.respond(user_id, body.id, body.action).await {
        Ok(updated) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": RespondGiftResponse { status: updated.status }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn social_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/social")
            .route("/search", web::get().to(search_users))
            .route("/request", web::post().to(send_friend_request))
            .route("/respond", web::post().to(respond_friend_request))
            .route("/friends", web::get().to(list_friends))
            .route("/gift", web::post().to(send_gift))
            .route("/gift/respond", web::post().to(respond_gift))
            .route("/gifts", web::get().to(list_gifts)),
    );
}
