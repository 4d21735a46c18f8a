use sea_orm_migration::prelude::*;

/// Login Bonus Claims (登录奖励领取记录, 只追加)
/// bonus_date 为领取窗口起点所在日期 (按服务基准时区的重置时刻切窗),
/// (user_id, bonus_date) 唯一约束保证同一窗口最多领取一次。
#[derive(DeriveIden)]
enum LoginBonusClaims {
    Table,
    Id,
    UserId,
    BonusDate,
    ClaimedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginBonusClaims::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginBonusClaims::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(LoginBonusClaims::UserId).uuid().not_null())
                    .col(ColumnDef::new(LoginBonusClaims::BonusDate).date().not_null())
                    .col(
                        ColumnDef::new(LoginBonusClaims::ClaimedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一窗口只允许一条记录 (并发领取靠它裁决)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_login_bonus_claims_user_date_unique")
                    .table(LoginBonusClaims::Table)
                    .col(LoginBonusClaims::UserId)
                    .col(LoginBonusClaims::BonusDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(LoginBonusClaims::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
