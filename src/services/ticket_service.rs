use crate::entities::{ticket_type_entity as ticket_types, user_ticket_entity as user_tickets};
use crate::error::{AppError, AppResult};
use crate::models::TicketBalanceResponse;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

// -----------------------------
// 奖券台账原语
// 供抽卡/登录奖励/转赠/入金回调在各自事务内组合使用
// -----------------------------

/// 读取余额 (无记录按 0)
pub async fn get_balance<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    ticket_type_id: Uuid,
) -> AppResult<i64> {
    let row = user_tickets::Entity::find()
        .filter(user_tickets::Column::UserId.eq(user_id))
        .filter(user_tickets::Column::TicketTypeId.eq(ticket_type_id))
        .one(conn)
        .await?;
    Ok(row.map(|r| r.quantity).unwrap_or(0))
}

/// 条件扣减: 仅当余额 >= amount 时原子减少
/// 返回是否扣减成功 (false = 余额不足, 包括并发竞争下的二次扣减)
pub async fn debit_tickets<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    ticket_type_id: Uuid,
    amount: i64,
) -> AppResult<bool> {
    let res = user_tickets::Entity::update_many()
        .col_expr(
            user_tickets::Column::Quantity,
            Expr::col(user_tickets::Column::Quantity).sub(amount),
        )
        .col_expr(user_tickets::Column::UpdatedAt, Expr::cust("NOW()"))
        .filter(user_tickets::Column::UserId.eq(user_id))
        .filter(user_tickets::Column::TicketTypeId.eq(ticket_type_id))
        .filter(user_tickets::Column::Quantity.gte(amount))
        .exec(conn)
        .await?;
    Ok(res.rows_affected == 1)
}

/// 加算 (upsert): 已有记录原子累加, 否则插入新记录
pub async fn credit_tickets<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    ticket_type_id: Uuid,
    amount: i64,
) -> AppResult<()> {
    let res = user_tickets::Entity::update_many()
        .col_expr(
            user_tickets::Column::Quantity,
            Expr::col(user_tickets::Column::Quantity).add(amount),
        )
        .col_expr(user_tickets::Column::UpdatedAt, Expr::cust("NOW()"))
        .filter(user_tickets::Column::UserId.eq(user_id))
        .filter(user_tickets::Column::TicketTypeId.eq(ticket_type_id))
        .exec(conn)
        .await?;

    if res.rows_affected == 0 {
        user_tickets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            ticket_type_id: Set(ticket_type_id),
            quantity: Set(amount),
            updated_at: Set(Some(Utc::now())),
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

/// 扣减但以 0 为下限 (转赠拒收回滚用, 接收方可能已消费部分)
pub async fn debit_tickets_floored<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    ticket_type_id: Uuid,
    amount: i64,
) -> AppResult<()> {
    let row = user_tickets::Entity::find()
        .filter(user_tickets::Column::UserId.eq(user_id))
        .filter(user_tickets::Column::TicketTypeId.eq(ticket_type_id))
        .one(conn)
        .await?;

    if let Some(row) = row {
        let new_quantity = (row.quantity - amount).max(0);
        let mut am = row.into_active_model();
        am.quantity = Set(new_quantity);
        am.updated_at = Set(Some(Utc::now()));
        am.update(conn).await?;
    }
    Ok(())
}

/// 按 code 查奖券种类
pub async fn find_type_by_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> AppResult<Option<ticket_types::Model>> {
    let row = ticket_types::Entity::find()
        .filter(ticket_types::Column::Code.eq(code))
        .one(conn)
        .await?;
    Ok(row)
}

#[derive(Clone)]
pub struct TicketService {
    pool: DatabaseConnection,
}

impl TicketService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 全奖券种类 + 用户余额 (无记录按 0), 按 sort_order
    pub async fn list_balances(&self, user_id: Uuid) -> AppResult<Vec<TicketBalanceResponse>> {
        let types = ticket_types::Entity::find()
            .order_by_asc(ticket_types::Column::SortOrder)
            .all(&self.pool)
            .await?;

        let balances = user_tickets::Entity::find()
            .filter(user_tickets::Column::UserId.eq(user_id))
            .all(&self.pool)
            .await?;
        let by_type: HashMap<Uuid, i64> = balances
            .into_iter()
            .map(|b| (b.ticket_type_id, b.quantity))
            .collect();

        Ok(types
            .into_iter()
            .map(|t| {
                let quantity = by_type.get(&t.id).copied().unwrap_or(0);
                TicketBalanceResponse::from_type(t, quantity)
            })
            .collect())
    }

    /// 按 code 发放奖券 (入金回调用), 返回发放后余额
    pub async fn grant_by_code(
        &self,
        user_id: Uuid,
        ticket_code: &str,
        amount: i64,
    ) -> AppResult<i64> {
        if amount <= 0 {
            return Err(AppError::ValidationError(
                "Grant amount must be positive".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let ticket_type = find_type_by_code(&txn, ticket_code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Unknown ticket type: {ticket_code}")))?;

        credit_tickets(&txn, user_id, ticket_type.id, amount).await?;
        let balance = get_balance(&txn, user_id, ticket_type.id).await?;
        txn.commit().await?;

        log::info!("Granted {amount} x {ticket_code} tickets to user {user_id}");
        Ok(balance)
    }
}
