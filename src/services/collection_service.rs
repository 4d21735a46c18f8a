use crate::entities::{horse_entity as horses, user_collection_entity as collections};
use crate::error::AppResult;
use crate::models::{CollectionEntryResponse, CollectionResponse};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

// -----------------------------
// 收藏台账原语
// -----------------------------

/// 所持数量加算 (upsert)
/// 无既存记录时插入并写入 first_acquired_at; 返回是否为首次获得
pub async fn credit_collection<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    horse_id: Uuid,
    count: i64,
    acquired_at: DateTime<Utc>,
) -> AppResult<bool> {
    let res = collections::Entity::update_many()
        .col_expr(
            collections::Column::Quantity,
            Expr::col(collections::Column::Quantity).add(count),
        )
        .filter(collections::Column::UserId.eq(user_id))
        .filter(collections::Column::HorseId.eq(horse_id))
        .exec(conn)
        .await?;

    if res.rows_affected > 0 {
        return Ok(false);
    }

    collections::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        horse_id: Set(horse_id),
        quantity: Set(count),
        first_acquired_at: Set(acquired_at),
    }
    .insert(conn)
    .await?;
    Ok(true)
}

/// 条件扣减: 仅当所持数量 >= count 时原子减少
pub async fn debit_collection<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    horse_id: Uuid,
    count: i64,
) -> AppResult<bool> {
    let res = collections::Entity::update_many()
        .col_expr(
            collections::Column::Quantity,
            Expr::col(collections::Column::Quantity).sub(count),
        )
        .filter(collections::Column::UserId.eq(user_id))
        .filter(collections::Column::HorseId.eq(horse_id))
        .filter(collections::Column::Quantity.gte(count))
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}

/// 扣减但以 0 为下限 (转赠拒收回滚用)
pub async fn debit_collection_floored<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    horse_id: Uuid,
    count: i64,
) -> AppResult<()> {
    let row = collections::Entity::find()
        .filter(collections::Column::UserId.eq(user_id))
        .filter(collections::Column::HorseId.eq(horse_id))
        .one(conn)
        .await?;

    if let Some(row) = row {
        let new_quantity = (row.quantity - count).max(0);
        let mut am = row.into_active_model();
        am.quantity = Set(new_quantity);
        am.update(conn).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct CollectionService {
    pool: DatabaseConnection,
}

impl CollectionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 收藏一览 + 完成度 (去重所持 / 现役马匹总数)
    pub async fn list(&self, user_id: Uuid) -> AppResult<CollectionResponse> {
        let rows = collections::Entity::find()
            .filter(collections::Column::UserId.eq(user_id))
            .filter(collections::Column::Quantity.gt(0))
            .order_by_desc(collections::Column::FirstAcquiredAt)
            .all(&self.pool)
            .await?;

        let horse_ids: Vec<Uuid> = rows.iter().map(|r| r.horse_id).collect();
        let horse_rows = if horse_ids.is_empty() {
            Vec::new()
        } else {
            horses::Entity::find()
                .filter(horses::Column::Id.is_in(horse_ids))
                .all(&self.pool)
                .await?
        };
        let by_id: HashMap<Uuid, horses::Model> =
            horse_rows.into_iter().map(|h| (h.id, h)).collect();

        let entries: Vec<CollectionEntryResponse> = rows
            .iter()
            .filter_map(|r| {
                by_id.get(&r.horse_id).map(|h| CollectionEntryResponse {
                    horse_id: h.id.to_string(),
                    name: h.name.clone(),
                    rarity: h.rarity,
                    card_image_url: h.card_image_url.clone(),
                    silhouette_image_url: h.silhouette_image_url.clone(),
                    quantity: r.quantity,
                    first_acquired_at: r.first_acquired_at,
                })
            })
            .collect();

        let total_horses = horses::Entity::find()
            .filter(horses::Column::IsActive.eq(true))
            .count(&self.pool)
            .await? as i64;

        let owned_distinct = entries.len() as i64;
        let completion = if total_horses > 0 {
            owned_distinct as f64 / total_horses as f64
        } else {
            0.0
        };

        Ok(CollectionResponse {
            entries,
            owned_distinct,
            total_horses,
            completion,
        })
    }
}
