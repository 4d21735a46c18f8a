use crate::error::AppError;
use crate::handlers::get_user_id_from_request;
use crate::models::*;
use crate::services::{CatalogService, GachaService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/gachas",
    tag = "gacha",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取抽卡机一览成功", body = GachaListResponse),
        (status = 401, description = "未授权")
    )
)]
/// 抽卡机目录一览
/// 线上目录为空或不可达时返回内置静态目录 (fallback = true)
pub async fn list_gachas(catalog: web::Data<CatalogService>) -> Result<HttpResponse> {
    match catalog.list().await {
        Ok(data) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gachas/{id}/rates",
    tag = "gacha",
    params(
        ("id" = String, Path, description = "抽卡机标识 (code / 名称 / 别名)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取概率池成功", body = [RateEntryResponse]),
        (status = 404, description = "抽卡机不存在"),
        (status = 401, description = "未授权")
    )
)]
/// 指定抽卡机的概率池展示
pub async fn get_rates(
    catalog: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    match catalog.rates(&path.into_inner()).await {
        Ok(list) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": list }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/gachas/{id}/pull",
    tag = "gacha",
    params(
        ("id" = String, Path, description = "抽卡机标识 (code / 名称 / 别名)")
    ),
    request_body = PullRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "抽卡成功 (目录未命中时为兜底结果 + warning)", body = PullResponse),
        (status = 400, description = "余额不足或其它业务错误"),
        (status = 401, description = "未授权")
    )
)]
/// 抽卡:
/// 1. 解析目录标识 (未命中走兜底结果, 不报错)
/// 2. 余额校验与原子扣减
/// 3. repeat 次独立加权抽取 (repeat 收敛到 [1,10])
/// 4. 收藏/履历落库后返回结果
pub async fn pull(
    service: web::Data<GachaService>,
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<PullRequest>>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };

    // body 缺失/非法时按 repeat=1 处理 (与原服务一致)
    let repeat = body.and_then(|b| b.repeat);

    match service.draw(user_id, &path.into_inner(), repeat).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gachas/history",
    tag = "gacha",
    params(
        ("page" = Option<u32>, Query, description = "页码 (默认1)"),
        ("per_page" = Option<u32>, Query, description = "每页数量 (默认20)")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "获取抽卡履历成功", body = PaginatedResponse<GachaHistoryResponse>),
        (status = 401, description = "未授权")
    )
)]
/// 分页获取抽卡履历 (倒序)
pub async fn get_history(
    service: web::Data<GachaService>,
    req: HttpRequest,
    query: web::Query<HistoryQuery>,
) -> Result<HttpResponse> {
    let user_id = match get_user_id_from_request(&req) {
        Some(id) => id,
        None => {
            return Ok(AppError::AuthError("Missing session".to_string()).error_response());
        }
    };
    match service.list_history(user_id, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": page }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn gacha_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gachas")
            .route("", web::get().to(list_gachas))
            // 固定路径需在 {id} 动态段之前注册
            .route("/history", web::get().to(get_history))
            .route("/{id}/rates", web::get().to(get_rates))
            .route("/{id}/pull", web::post().to(pull)),
    );
}
