use crate::entities::{FriendshipStatus, friendship_entity as friendships, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{FriendAction, FriendResponse, UserSearchResponse};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    Order, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct FriendshipService {
    pool: DatabaseConnection,
}

impl FriendshipService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 发起好友申请
    /// 无序对唯一: 正反两个方向都查重, 每对用户最多一条关系记录
    pub async fn request(&self, requester_id: Uuid, to_user_id: Uuid) -> AppResult<friendships::Model> {
        if to_user_id == requester_id {
            return Err(AppError::ValidationError("不正な相手です".to_string()));
        }

        let txn = self.pool.begin().await?;

        let recipient = users::Entity::find_by_id(to_user_id).one(&txn).await?;
        if recipient.is_none() {
            return Err(AppError::NotFound("相手が見つかりません".to_string()));
        }

        let existing = friendships::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(friendships::Column::UserId.eq(requester_id))
                            .add(friendships::Column::FriendUserId.eq(to_user_id)),
                    )
                    .add(
                        Condition::all()
                            .add(friendships::Column::UserId.eq(to_user_id))
                            .add(friendships::Column::FriendUserId.eq(requester_id)),
                    ),
            )
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError("既に申請済みです".to_string()));
        }

        let row = friendships::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(requester_id),
            friend_user_id: Set(to_user_id),
            status: Set(FriendshipStatus::Pending),
            created_at: Set(Some(Utc::now())),
            updated_at: Set(Some(Utc::now())),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(row)
    }

    /// 应答好友申请 (仅被申请方, 仅 pending 状态)
    pub async fn respond(
        &self,
        responder_id: Uuid,
        friendship_id: Uuid,
        action: FriendAction,
    ) -> AppResult<friendships::Model> {
        let row = friendships::Entity::find_by_id(friendship_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("見つかりません".to_string()))?;

        if row.friend_user_id != responder_id {
            return Err(AppError::Forbidden);
        }
        if row.status != FriendshipStatus::Pending {
            return Err(AppError::AlreadyProcessed);
        }

        let new_status = match action {
            FriendAction::Accept => FriendshipStatus::Accepted,
            FriendAction::Decline => FriendshipStatus::Declined,
        };

        let mut am = row.into_active_model();
        am.status = Set(new_status);
        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        Ok(updated)
    }

    /// 好友/申请一览 (附对端用户信息)
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<FriendResponse>> {
        let rows = friendships::Entity::find()
            .filter(
                Condition::any()
                    .add(friendships::Column::UserId.eq(user_id))
                    .add(friendships::Column::FriendUserId.eq(user_id)),
            )
            .order_by(friendships::Column::CreatedAt, Order::Desc)
            .all(&self.pool)
            .await?;

        let other_ids: Vec<Uuid> = rows
            .iter()
            .map(|f| {
                if f.user_id == user_id {
                    f.friend_user_id
                } else {
                    f.user_id
                }
            })
            .collect();

        let users_by_id: HashMap<Uuid, users::Model> = if other_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(other_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        Ok(rows
            .into_iter()
            .filter_map(|f| {
                let requested_by_me = f.user_id == user_id;
                let other_id = if requested_by_me { f.friend_user_id } else { f.user_id };
                users_by_id.get(&other_id).map(|u| FriendResponse {
                    friendship_id: f.id.to_string(),
                    user_id: u.id.to_string(),
                    email: u.email.clone(),
                    display_name: u.display_name.clone(),
                    status: f.status,
                    requested_by_me,
                })
            })
            .collect())
    }

    /// 用户检索 (email 完全一致或显示名部分一致)
    pub async fn search(&self, query: &str) -> AppResult<Vec<UserSearchResponse>> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Ok(Vec::new());
        }

        let rows = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Email.eq(q.clone()))
                    .add(users::Column::DisplayName.contains(&q)),
            )
            .limit(10)
            .all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|u| UserSearchResponse {
                id: u.id.to_string(),
                email: u.email,
                display_name: u.display_name,
            })
            .collect())
    }
}
