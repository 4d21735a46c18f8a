use crate::entities::{
    gacha_entity as gachas, gacha_history_entity as history, horse_entity as horses,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    DrawResultItem, GachaHistoryPageResponse, GachaHistoryResponse, HistoryQuery,
    PaginatedResponse, PaginationParams, PullResponse,
};
use crate::services::catalog_service::{
    AnimationDescriptor, CatalogService, ResolvedCatalog, fallback_pool, resolve_animation,
};
use crate::services::{collection_service, ticket_service};
use crate::utils::{pick_uniform, pick_weighted_or_uniform};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

const FALLBACK_WARNING: &str = "Fallback result used (gacha not found)";

/// repeat 静默收敛到 [1, 10]; 非数值/缺省按 1
pub fn clamp_repeat(raw: Option<i64>) -> u32 {
    raw.unwrap_or(1).clamp(1, 10) as u32
}

/// 同一马匹在本次结果中的抽中次数 (出现顺序保持稳定)
pub fn group_counts(ids: &[Uuid]) -> Vec<(Uuid, i64)> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut counts: HashMap<Uuid, i64> = HashMap::new();
    for id in ids {
        if !counts.contains_key(id) {
            order.push(*id);
        }
        *counts.entry(*id).or_insert(0) += 1;
    }
    order.into_iter().map(|id| (id, counts[&id])).collect()
}

#[derive(Clone)]
pub struct GachaService {
    pool: DatabaseConnection,
    catalog: CatalogService,
}

impl GachaService {
    pub fn new(pool: DatabaseConnection, catalog: CatalogService) -> Self {
        Self { pool, catalog }
    }

    /// 抽卡 (Pull)
    ///
    /// 逻辑:
    /// 1. 解析目录 (别名 -> 定义); 未命中走静态兜底抽取, HTTP 200 + warning, 无持久化
    /// 2. 余额预检, 不足时直接失败且无任何变更
    /// 3. 加载加权池, repeat 次独立加权抽取 (有放回)
    /// 4. 逐项解析演出 (动态表未命中退静态表)
    /// 5. 条件扣减余额 (WHERE quantity >= repeat, 并发下第二个请求在此失败)
    /// 6. 收藏 upsert (首次获得写 first_acquired_at 并标记 is_new)
    /// 7. 按结果顺序追加履历
    /// 以上 5-7 在同一事务内, 任一步失败整体回滚
    pub async fn draw(
        &self,
        user_id: Uuid,
        identifier: &str,
        repeat_raw: Option<i64>,
    ) -> AppResult<PullResponse> {
        let repeat = clamp_repeat(repeat_raw);

        let (gacha, ticket_type) = match self.catalog.resolve(identifier).await {
            Ok(ResolvedCatalog::Live { gacha, ticket_type }) => (gacha, ticket_type),
            Ok(ResolvedCatalog::Fallback { def }) => {
                return Ok(fallback_draw(
                    def.ticket_label,
                    def.min_rarity,
                    def.max_rarity,
                    repeat,
                ));
            }
            Err(AppError::NotFound(_)) => {
                // 线上/静态目录都未命中: 按原服务行为以 [1,3] 区间兜底
                return Ok(fallback_draw("", 1, 3, repeat));
            }
            Err(e) => return Err(e),
        };

        let txn = self.pool.begin().await?;

        // 余额预检 (变更前校验)
        let balance = ticket_service::get_balance(&txn, user_id, ticket_type.id).await?;
        if balance < repeat as i64 {
            return Err(AppError::InsufficientFunds);
        }

        // 加权池; 目录行存在但池为空时同样降级为兜底抽取 (不扣费)
        let pool = self.catalog.load_pool(&txn, gacha.id).await?;
        if pool.is_empty() {
            txn.rollback().await?;
            log::warn!("Gacha {} has an empty weighted pool", gacha.id);
            return Ok(fallback_draw(
                &ticket_type.name,
                gacha.min_rarity,
                gacha.max_rarity,
                repeat,
            ));
        }

        let animations = self.catalog.load_animations(&txn).await?;

        // repeat 次独立抽取 (权重全 0 时退化为等概率)
        let mut rng = rand::thread_rng();
        let picked: Vec<(horses::Model, AnimationDescriptor)> = (0..repeat)
            .map(|_| {
                let horse = pick_weighted_or_uniform(&pool, &mut rng)
                    .expect("non-empty pool")
                    .clone();
                let animation = resolve_animation(horse.rarity, &animations);
                (horse, animation)
            })
            .collect();

        // 原子条件扣减; 预检通过后仍失败 = 并发竞争, 整体失败无变更
        if !ticket_service::debit_tickets(&txn, user_id, ticket_type.id, repeat as i64).await? {
            return Err(AppError::InsufficientFunds);
        }

        // 收藏 upsert: 按马匹分组累加, 首次获得标记 is_new
        let now = Utc::now();
        let picked_ids: Vec<Uuid> = picked.iter().map(|(h, _)| h.id).collect();
        let mut is_new_by_horse: HashMap<Uuid, bool> = HashMap::new();
        for (horse_id, count) in group_counts(&picked_ids) {
            let is_new =
                collection_service::credit_collection(&txn, user_id, horse_id, count, now).await?;
            is_new_by_horse.insert(horse_id, is_new);
        }

        // 履历追加 (顺序与返回结果一致)
        let history_rows: Vec<history::ActiveModel> = picked
            .iter()
            .map(|(horse, animation)| history::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                gacha_id: Set(gacha.id),
                horse_id: Set(horse.id),
                animation_index: Set(animation.index),
                created_at: Set(Some(now)),
            })
            .collect();
        history::Entity::insert_many(history_rows).exec(&txn).await?;

        let remaining = ticket_service::get_balance(&txn, user_id, ticket_type.id).await?;

        txn.commit().await?;

        let results = picked
            .into_iter()
            .map(|(horse, animation)| DrawResultItem {
                horse_id: horse.id.to_string(),
                horse: horse.name,
                rarity: horse.rarity,
                card_image_url: horse.card_image_url,
                animation: animation.key,
                animation_name: animation.name,
                animation_type: animation.animation_type,
                animation_asset_url: animation.asset_url,
                is_new: is_new_by_horse.get(&horse.id).copied().unwrap_or(false),
            })
            .collect();

        Ok(PullResponse {
            ticket: ticket_type.name,
            results,
            remaining: Some(remaining),
            warning: None,
            fallback: false,
        })
    }

    /// 抽卡履历 (分页, 倒序)
    pub async fn list_history(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> AppResult<GachaHistoryPageResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let offset = params.get_offset();
        let limit = params.get_limit();

        let base_query = history::Entity::find().filter(history::Column::UserId.eq(user_id));

        let total = base_query.clone().count(&self.pool).await? as i64;

        let rows = base_query
            .order_by(history::Column::CreatedAt, Order::Desc)
            .limit(limit as u64)
            .offset(offset as u64)
            .all(&self.pool)
            .await?;

        // 展示用联表快照 (马匹名 / 抽卡机名)
        let horse_ids: Vec<Uuid> = rows.iter().map(|r| r.horse_id).collect();
        let gacha_ids: Vec<Uuid> = rows.iter().map(|r| r.gacha_id).collect();

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
        let gachas_by_id: HashMap<Uuid, gachas::Model> = if gacha_ids.is_empty() {
            HashMap::new()
        } else {
            gachas::Entity::find()
                .filter(gachas::Column::Id.is_in(gacha_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|g| (g.id, g))
                .collect()
        };

        let items: Vec<GachaHistoryResponse> = rows
            .into_iter()
            .map(|r| {
                let horse = horses_by_id.get(&r.horse_id);
                GachaHistoryResponse {
                    id: r.id.to_string(),
                    gacha_name: gachas_by_id
                        .get(&r.gacha_id)
                        .map(|g| g.name.clone())
                        .unwrap_or_default(),
                    horse_name: horse.map(|h| h.name.clone()).unwrap_or_default(),
                    rarity: horse.map(|h| h.rarity).unwrap_or(0),
                    animation_index: r.animation_index,
                    created_at: r.created_at.unwrap_or_else(Utc::now),
                }
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }
}

/// 静态兜底抽取: 等概率, 无持久化, 结果附 warning
fn fallback_draw(ticket_label: &str, min_rarity: i32, max_rarity: i32, repeat: u32) -> PullResponse {
    let pool = fallback_pool(min_rarity, max_rarity);
    let mut rng = rand::thread_rng();

    let results = (0..repeat)
        .map(|_| {
            let horse = pick_uniform(&pool, &mut rng).expect("non-empty static pool");
            let animation = resolve_animation(horse.rarity, &[]);
            DrawResultItem {
                horse_id: horse.id.to_string(),
                horse: horse.name.to_string(),
                rarity: horse.rarity,
                card_image_url: horse.card_image_url.map(|s| s.to_string()),
                animation: animation.key,
                animation_name: animation.name,
                animation_type: animation.animation_type,
                animation_asset_url: animation.asset_url,
                is_new: false,
            }
        })
        .collect();

    PullResponse {
        ticket: ticket_label.to_string(),
        results,
        remaining: None,
        warning: Some(FALLBACK_WARNING.to_string()),
        fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_repeat() {
        assert_eq!(clamp_repeat(None), 1);
        assert_eq!(clamp_repeat(Some(0)), 1);
        assert_eq!(clamp_repeat(Some(-5)), 1);
        assert_eq!(clamp_repeat(Some(1)), 1);
        assert_eq!(clamp_repeat(Some(7)), 7);
        assert_eq!(clamp_repeat(Some(10)), 10);
        assert_eq!(clamp_repeat(Some(999)), 10);
    }

    #[test]
    fn test_group_counts_preserves_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = vec![a, b, a, a, b];
        let grouped = group_counts(&ids);
        assert_eq!(grouped, vec![(a, 3), (b, 2)]);
    }

    #[test]
    fn test_group_counts_empty() {
        assert!(group_counts(&[]).is_empty());
    }

    #[test]
    fn test_fallback_draw_respects_repeat_and_rarity_range() {
        let res = fallback_draw("プレミアムチケット", 5, 10, 10);
        assert_eq!(res.results.len(), 10);
        assert!(res.fallback);
        assert!(res.warning.is_some());
        assert!(res.remaining.is_none());
        for item in &res.results {
            assert!(item.rarity >= 5 && item.rarity <= 10);
            assert!(!item.is_new);
            assert!(!item.animation.is_empty());
        }
    }

    #[test]
    fn test_fallback_draw_single() {
        let res = fallback_draw("フリーチケット", 1, 3, 1);
        assert_eq!(res.results.len(), 1);
        assert!(res.results[0].rarity >= 1 && res.results[0].rarity <= 3);
    }
}
