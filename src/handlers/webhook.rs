use crate::error::AppResult;
use crate::external::stripe::StripeService;
use crate::services::TicketService;
use actix_web::{HttpRequest, HttpResponse, Result, web};
use log::{error, info, warn};
use stripe::{Event, EventObject, EventType};
use uuid::Uuid;

/// Stripe webhook处理器
///
/// 入金成功 (checkout.session.completed) 时按 metadata 发放购入的奖券。
/// 实际收款流程在外部托管, 这里只做签名校验 + 发放。
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Bytes,
    stripe_service: web::Data<StripeService>,
    ticket_service: web::Data<TicketService>,
) -> Result<HttpResponse> {
    let signature = match req.headers().get("stripe-signature") {
        Some(sig) => sig.to_str().unwrap_or(""),
        None => {
            warn!("Missing Stripe-Signature header");
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing Stripe-Signature header"
            })));
        }
    };

    let payload = std::str::from_utf8(&body).map_err(|_| {
        error!("Invalid UTF-8 in webhook payload");
        actix_web::error::ErrorBadRequest("Invalid payload encoding")
    })?;

    // 验证webhook签名
    let event = match stripe_service.verify_webhook_signature(payload, signature) {
        Ok(event) => event,
        Err(e) => {
            error!("Webhook signature verification failed: {e}");
            return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "Invalid signature"
            })));
        }
    };

    info!(
        "Received Stripe webhook event: {} ({})",
        event.type_, event.id
    );

    match handle_stripe_event(event, &ticket_service).await {
        Ok(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "received": true
        }))),
        Err(e) => {
            error!("Failed to process webhook event: {e}");
            // 返回200状态码避免Stripe重试, 但记录错误
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "received": true,
                "error": format!("Processing failed: {}", e)
            })))
        }
    }
}

/// 处理具体的Stripe事件
async fn handle_stripe_event(event: Event, ticket_service: &TicketService) -> AppResult<()> {
    match event.type_ {
        EventType::CheckoutSessionCompleted => {
            if let EventObject::CheckoutSession(session) = event.data.object {
                let metadata = session.metadata.clone().unwrap_or_default();

                let user_id = metadata
                    .get("user_id")
                    .and_then(|v| v.parse::<Uuid>().ok());
                let ticket_code = metadata.get("ticket_code").cloned();
                let quantity = metadata
                    .get("quantity")
                    .and_then(|v| v.parse::<i64>().ok())
                    .unwrap_or(1);

                match (user_id, ticket_code) {
                    (Some(user_id), Some(code)) => {
                        let balance = ticket_service.grant_by_code(user_id, &code, quantity).await?;
                        info!(
                            "Checkout completed: granted {quantity} x {code} to {user_id} (balance {balance})"
                        );
                    }
                    _ => {
                        warn!(
                            "Checkout session {} missing user_id/ticket_code metadata",
                            session.id
                        );
                    }
                }
            }
            Ok(())
        }
        _ => {
            info!("Unhandled event type: {:?}", event.type_);
            Ok(())
        }
    }
}

/// 配置webhook路由
pub fn webhook_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/webhook").route("/stripe", web::post().to(stripe_webhook)));
}
