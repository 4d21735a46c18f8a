use crate::config::BonusConfig;
use crate::entities::login_bonus_claims as claims;
use crate::error::{AppError, AppResult};
use crate::models::{BonusClaimResponse, BonusStatusResponse};
use crate::services::ticket_service;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sea_orm::sea_query::{OnConflict, PostgresQueryBuilder, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

/// 当前领取窗口的起点 (UTC)
/// 窗口以基准时区 (utc_offset_hours) 的 reset_hour 为界:
/// 本地时刻已过今日重置点 -> 今日重置点, 否则 -> 昨日重置点
pub fn window_start(now: DateTime<Utc>, reset_hour: u32, utc_offset_hours: i32) -> DateTime<Utc> {
    let offset = Duration::hours(utc_offset_hours as i64);
    let local = now + offset;
    let today_reset_local = local
        .date_naive()
        .and_hms_opt(reset_hour.min(23), 0, 0)
        .expect("reset hour clamped to valid range");
    let today_reset = Utc.from_utc_datetime(&(today_reset_local - offset));

    if now >= today_reset {
        today_reset
    } else {
        today_reset - Duration::days(1)
    }
}

/// 窗口键: 窗口起点在基准时区的日期, 唯一约束 (user_id, bonus_date) 用
pub fn window_key(window_start: DateTime<Utc>, utc_offset_hours: i32) -> NaiveDate {
    (window_start + Duration::hours(utc_offset_hours as i64)).date_naive()
}

#[derive(Clone)]
pub struct LoginBonusService {
    pool: DatabaseConnection,
    config: BonusConfig,
}

impl LoginBonusService {
    pub fn new(pool: DatabaseConnection, config: BonusConfig) -> Self {
        Self { pool, config }
    }

    /// 本窗口是否已领取 (GET)
    pub async fn status(&self, user_id: Uuid) -> AppResult<BonusStatusResponse> {
        let now = Utc::now();
        let ws = window_start(now, self.config.reset_hour, self.config.utc_offset_hours);
        let next_reset_at = ws + Duration::days(1);

        let latest = self.latest_claim(&self.pool, user_id).await?;
        let claimed = latest.map(|c| c.claimed_at >= ws).unwrap_or(false);

        Ok(BonusStatusResponse {
            claimed,
            next_reset_at,
        })
    }

    /// 领取登录奖励 (POST)
    ///
    /// 逻辑:
    /// 1. 计算窗口起点, 读取最近一次领取记录, 已在窗口内 -> AlreadyClaimed
    /// 2. ON CONFLICT (user_id, bonus_date) DO NOTHING 插入领取记录,
    ///    0 行受影响说明并发领取已成功 -> AlreadyClaimed
    /// 3. 加算免费奖券余额
    /// 全部在同一事务内, 失败整体回滚
    pub async fn claim(&self, user_id: Uuid) -> AppResult<BonusClaimResponse> {
        let now = Utc::now();
        let ws = window_start(now, self.config.reset_hour, self.config.utc_offset_hours);
        let next_reset_at = ws + Duration::days(1);
        let bonus_date = window_key(ws, self.config.utc_offset_hours);

        let txn = self.pool.begin().await?;

        let latest = self.latest_claim(&txn, user_id).await?;
        if let Some(c) = latest
            && c.claimed_at >= ws
        {
            return Err(AppError::AlreadyClaimed { next_reset_at });
        }

        // 唯一约束裁决并发: 插入不成功即本窗口已有记录
        let insert = Query::insert()
            .into_table(claims::Entity)
            .columns([
                claims::Column::Id,
                claims::Column::UserId,
                claims::Column::BonusDate,
                claims::Column::ClaimedAt,
            ])
            .values_panic([
                Uuid::new_v4().into(),
                user_id.into(),
                bonus_date.into(),
                now.into(),
            ])
            .on_conflict(
                OnConflict::columns([claims::Column::UserId, claims::Column::BonusDate])
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();
        let (sql, values) = insert.build(PostgresQueryBuilder);
        let stmt =
            sea_orm::Statement::from_sql_and_values(sea_orm::DatabaseBackend::Postgres, sql, values);
        let res = txn.execute(stmt).await?;
        if res.rows_affected() == 0 {
            return Err(AppError::AlreadyClaimed { next_reset_at });
        }

        let ticket_type = ticket_service::find_type_by_code(&txn, &self.config.ticket_code)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Bonus ticket type not configured: {}",
                    self.config.ticket_code
                ))
            })?;

        ticket_service::credit_tickets(&txn, user_id, ticket_type.id, self.config.amount).await?;
        let new_balance = ticket_service::get_balance(&txn, user_id, ticket_type.id).await?;

        txn.commit().await?;

        Ok(BonusClaimResponse {
            ticket: ticket_type.code,
            amount: self.config.amount,
            new_balance,
            next_reset_at,
            message: format!("{}を付与しました", ticket_type.name),
        })
    }

    async fn latest_claim<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: Uuid,
    ) -> AppResult<Option<claims::Model>> {
        let row = claims::Entity::find()
            .filter(claims::Column::UserId.eq(user_id))
            .order_by_desc(claims::Column::ClaimedAt)
            .one(conn)
            .await?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn utc(s: &str) -> DateTime<Utc> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        Utc.from_utc_datetime(&naive)
    }

    // 基准: JST (UTC+9), 10:00 重置 -> UTC 01:00

    #[test]
    fn test_window_start_after_reset() {
        // JST 12:00 (= UTC 03:00) 属于当日窗口
        let ws = window_start(utc("2026-01-10 03:00:00"), 10, 9);
        assert_eq!(ws, utc("2026-01-10 01:00:00"));
    }

    #[test]
    fn test_window_start_before_reset() {
        // JST 09:00 (= UTC 00:00) 还在昨日窗口
        let ws = window_start(utc("2026-01-10 00:00:00"), 10, 9);
        assert_eq!(ws, utc("2026-01-09 01:00:00"));
    }

    #[test]
    fn test_window_start_exactly_at_reset() {
        let ws = window_start(utc("2026-01-10 01:00:00"), 10, 9);
        assert_eq!(ws, utc("2026-01-10 01:00:00"));
    }

    #[test]
    fn test_window_stable_within_one_window() {
        // 同一窗口内任意时刻的窗口起点一致
        let a = window_start(utc("2026-01-10 01:00:00"), 10, 9);
        let b = window_start(utc("2026-01-10 18:30:00"), 10, 9);
        let c = window_start(utc("2026-01-11 00:59:59"), 10, 9);
        assert_eq!(a, b);
        assert_eq!(b, c);

        // 跨过重置点后起点前移一天
        let d = window_start(utc("2026-01-11 01:00:00"), 10, 9);
        assert_eq!(d, a + Duration::days(1));
    }

    #[test]
    fn test_window_key_is_local_date_of_reset() {
        let ws = window_start(utc("2026-01-10 03:00:00"), 10, 9);
        assert_eq!(
            window_key(ws, 9),
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
        );

        // 重置前仍是前一日的窗口键
        let ws = window_start(utc("2026-01-10 00:00:00"), 10, 9);
        assert_eq!(
            window_key(ws, 9),
            NaiveDate::from_ymd_opt(2026, 1, 9).unwrap()
        );
    }

    #[test]
    fn test_window_with_utc_reference() {
        // offset 为 0 时直接按 UTC 的 reset_hour 切窗
        let ws = window_start(utc("2026-03-05 09:59:59"), 10, 0);
        assert_eq!(ws, utc("2026-03-04 10:00:00"));
        let ws = window_start(utc("2026-03-05 10:00:00"), 10, 0);
        assert_eq!(ws, utc("2026-03-05 10:00:00"));
    }
}
