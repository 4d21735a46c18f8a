use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::FriendshipStatus;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FriendRequestPayload {
    pub to_user_id: Uuid,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FriendAction {
    Accept,
    Decline,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RespondFriendRequest {
    pub id: Uuid,
    pub action: FriendAction,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RespondFriendResponse {
    pub status: FriendshipStatus,
}

/// 好友/申请条目 (对端用户视角)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FriendResponse {
    pub friendship_id: String,
    pub user_id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub status: FriendshipStatus,
    /// 申请是否由当前用户发起
    pub requested_by_me: bool,
}

/// 用户搜索查询
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserSearchQuery {
    pub q: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSearchResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
