use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{FriendshipStatus, GiftKind, GiftStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::gacha::list_gachas,
        handlers::gacha::get_rates,
        handlers::gacha::pull,
        handlers::gacha::get_history,
        handlers::ticket::get_tickets,
        handlers::ticket::get_bonus_status,
        handlers::ticket::claim_bonus,
        handlers::collection::get_collection,
        handlers::social::search_users,
        handlers::social::send_friend_request,
        handlers::social::respond_friend_request,
        handlers::social::list_friends,
        handlers::social::send_gift,
        handlers::social::list_gifts,
        handlers::social::respond_gift,
    ),
    components(
        schemas(
            ApiError,
            GachaListResponse,
            GachaSummaryResponse,
            RateEntryResponse,
            PullRequest,
            PullResponse,
            DrawResultItem,
            HistoryQuery,
            GachaHistoryResponse,
            TicketBalanceResponse,
            BonusStatusResponse,
            BonusClaimResponse,
            CollectionResponse,
            CollectionEntryResponse,
            SendGiftRequest,
            RespondGiftRequest,
            RespondGiftResponse,
            GiftResponse,
            GiftListResponse,
            GiftAction,
            GiftKind,
            GiftStatus,
            FriendRequestPayload,
            RespondFriendRequest,
            RespondFriendResponse,
            FriendResponse,
            FriendAction,
            FriendshipStatus,
            UserSearchQuery,
            UserSearchResponse,
            PaginationParams,
            PaginationInfo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "gacha", description = "Gacha catalog and draw API"),
        (name = "ticket", description = "Ticket balance and login bonus API"),
        (name = "collection", description = "Collection progress API"),
        (name = "social", description = "Friend and gift API"),
    ),
    info(
        title = "Umagacha Backend API",
        version = "1.0.0",
        description = "Horse gacha collection backend REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
