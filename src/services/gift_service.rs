use crate::entities::{
    GiftKind, GiftStatus, gift_entity as gifts, horse_entity as horses,
    ticket_type_entity as ticket_types, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::{GiftAction, GiftListResponse, GiftResponse, SendGiftRequest};
use crate::services::{collection_service, ticket_service};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    Order, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct GiftService {
    pool: DatabaseConnection,
}

impl GiftService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 发送转赠
    ///
    /// 逻辑 (同一事务):
    /// 1. 校验: 不能送给自己, 数量 > 0, 对端用户存在
    /// 2. 条件扣减发送方 (奖券余额或收藏数量, 不足即失败且无变更)
    /// 3. 加算接收方 (upsert; 收藏首次获得写 first_acquired_at)
    /// 4. 插入 status=sent 的转赠记录
    /// 资产在发送时即转移, 拒收时再回滚
    pub async fn send(&self, sender_id: Uuid, req: &SendGiftRequest) -> AppResult<gifts::Model> {
        if req.to_user_id == sender_id {
            return Err(AppError::ValidationError("不正な相手です".to_string()));
        }
        if req.quantity <= 0 {
            return Err(AppError::ValidationError("数量が不正です".to_string()));
        }

        let txn = self.pool.begin().await?;

        let recipient = users::Entity::find_by_id(req.to_user_id).one(&txn).await?;
        if recipient.is_none() {
            return Err(AppError::NotFound("相手が見つかりません".to_string()));
        }

        let now = Utc::now();
        let gift = match req.kind {
            GiftKind::Ticket => {
                let code = req.ticket_code.as_deref().ok_or_else(|| {
                    AppError::ValidationError("チケット情報が不足しています".to_string())
                })?;
                let ticket_type = ticket_service::find_type_by_code(&txn, code)
                    .await?
                    .ok_or_else(|| {
                        AppError::ValidationError("チケット種別が存在しません".to_string())
                    })?;

                if !ticket_service::debit_tickets(&txn, sender_id, ticket_type.id, req.quantity)
                    .await?
                {
                    return Err(AppError::InsufficientFunds);
                }
                ticket_service::credit_tickets(&txn, req.to_user_id, ticket_type.id, req.quantity)
                    .await?;

                gifts::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    from_user_id: Set(sender_id),
                    to_user_id: Set(req.to_user_id),
                    kind: Set(GiftKind::Ticket),
                    ticket_type_id: Set(Some(ticket_type.id)),
                    horse_id: Set(None),
                    quantity: Set(req.quantity),
                    status: Set(GiftStatus::Sent),
                    created_at: Set(Some(now)),
                    responded_at: Set(None),
                }
                .insert(&txn)
                .await?
            }
            GiftKind::Horse => {
                let horse_id = req.horse_id.ok_or_else(|| {
                    AppError::ValidationError("馬IDが不足しています".to_string())
                })?;

                if !collection_service::debit_collection(&txn, sender_id, horse_id, req.quantity)
                    .await?
                {
                    return Err(AppError::InsufficientItems);
                }
                collection_service::credit_collection(
                    &txn,
                    req.to_user_id,
                    horse_id,
                    req.quantity,
                    now,
                )
                .await?;

                gifts::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    from_user_id: Set(sender_id),
                    to_user_id: Set(req.to_user_id),
                    kind: Set(GiftKind::Horse),
                    ticket_type_id: Set(None),
                    horse_id: Set(Some(horse_id)),
                    quantity: Set(req.quantity),
                    status: Set(GiftStatus::Sent),
                    created_at: Set(Some(now)),
                    responded_at: Set(None),
                }
                .insert(&txn)
                .await?
            }
        };

        txn.commit().await?;
        Ok(gift)
    }

    /// 应答转赠 (仅接收方, 仅 sent 状态)
    ///
    /// decline: 同一事务内回滚转移 (接收方扣减以 0 为下限, 发送方加算),
    /// 再把状态推进到 declined。accept 仅推进状态, 资产已在发送时交付。
    pub async fn respond(
        &self,
        responder_id: Uuid,
        gift_id: Uuid,
        action: GiftAction,
    ) -> AppResult<gifts::Model> {
        let txn = self.pool.begin().await?;

        let gift = gifts::Entity::find_by_id(gift_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("見つかりません".to_string()))?;

        if gift.to_user_id != responder_id {
            return Err(AppError::Forbidden);
        }
        if gift.status != GiftStatus::Sent {
            return Err(AppError::AlreadyProcessed);
        }

        if action == GiftAction::Decline {
            match gift.kind {
                GiftKind::Ticket => {
                    let ticket_type_id = gift.ticket_type_id.ok_or_else(|| {
                        AppError::InternalError("Ticket gift without ticket_type_id".to_string())
                    })?;
                    ticket_service::debit_tickets_floored(
                        &txn,
                        gift.to_user_id,
                        ticket_type_id,
                        gift.quantity,
                    )
                    .await?;
                    ticket_service::credit_tickets(
                        &txn,
                        gift.from_user_id,
                        ticket_type_id,
                        gift.quantity,
                    )
                    .await?;
                }
                GiftKind::Horse => {
                    let horse_id = gift.horse_id.ok_or_else(|| {
                        AppError::InternalError("Horse gift without horse_id".to_string())
                    })?;
                    collection_service::debit_collection_floored(
                        &txn,
                        gift.to_user_id,
                        horse_id,
                        gift.quantity,
                    )
                    .await?;
                    collection_service::credit_collection(
                        &txn,
                        gift.from_user_id,
                        horse_id,
                        gift.quantity,
                        Utc::now(),
                    )
                    .await?;
                }
            }
        }

        let new_status = match action {
            GiftAction::Accept => GiftStatus::Accepted,
            GiftAction::Decline => GiftStatus::Declined,
        };

        let mut am = gift.into_active_model();
        am.status = Set(new_status);
        am.responded_at = Set(Some(Utc::now()));
        let updated = am.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// 收发一览 (倒序), 展示用联表奖券/马匹名称
    pub async fn list(&self, user_id: Uuid) -> AppResult<GiftListResponse> {
        let rows = gifts::Entity::find()
            .filter(
                Condition::any()
                    .add(gifts::Column::FromUserId.eq(user_id))
                    .add(gifts::Column::ToUserId.eq(user_id)),
            )
            .order_by(gifts::Column::CreatedAt, Order::Desc)
            .all(&self.pool)
            .await?;

        let ticket_type_ids: Vec<Uuid> = rows.iter().filter_map(|g| g.ticket_type_id).collect();
        let horse_ids: Vec<Uuid> = rows.iter().filter_map(|g| g.horse_id).collect();

        let types_by_id: HashMap<Uuid, ticket_types::Model> = if ticket_type_ids.is_empty() {
            HashMap::new()
        } else {
            ticket_types::Entity::find()
                .filter(ticket_types::Column::Id.is_in(ticket_type_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|t| (t.id, t))
                .collect()
        };
        let horses_by_id: HashMap<Uuid, horses::Model> = if horse_ids.is_empty() {
            HashMap::new()
        } else {
            horses::Entity::find()
                .filter(horses::Column::Id.is_in(horse_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|h| (h.id, h))
                .collect()
        };

        let to_response = |g: gifts::Model| {
            let ticket = g.ticket_type_id.and_then(|id| types_by_id.get(&id));
            let horse = g.horse_id.and_then(|id| horses_by_id.get(&id));
            GiftResponse {
                id: g.id.to_string(),
                from_user_id: g.from_user_id.to_string(),
                to_user_id: g.to_user_id.to_string(),
                kind: g.kind,
                ticket_code: ticket.map(|t| t.code.clone()),
                ticket_name: ticket.map(|t| t.name.clone()),
                horse_name: horse.map(|h| h.name.clone()),
                horse_rarity: horse.map(|h| h.rarity),
                quantity: g.quantity,
                status: g.status,
                created_at: g.created_at.unwrap_or_else(Utc::now),
                responded_at: g.responded_at,
            }
        };

        let (incoming, outgoing): (Vec<gifts::Model>, Vec<gifts::Model>) =
            rows.into_iter().partition(|g| g.to_user_id == user_id);

        Ok(GiftListResponse {
            incoming: incoming.into_iter().map(&to_response).collect(),
            outgoing: outgoing.into_iter().map(&to_response).collect(),
        })
    }
}
