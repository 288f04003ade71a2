//! Migration: Create customers, profiles, insurance plans, insurances and blacklist.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::CustomerName).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Customers::EmailAddress)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Profiles::CustomerId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::Activated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_customer")
                            .from(Profiles::Table, Profiles::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InsurancePlans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(InsurancePlans::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(InsurancePlans::InsurancePlanName)
                            .string_len(200)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_insurance_plans_name")
                    .table(InsurancePlans::Table)
                    .col(InsurancePlans::InsurancePlanName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Insurances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Insurances::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Insurances::InsuredAmount).big_integer().not_null())
                    .col(ColumnDef::new(Insurances::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Insurances::InsurancePlanId).uuid().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insurances_customer")
                            .from(Insurances::Table, Insurances::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_insurances_plan")
                            .from(Insurances::Table, Insurances::InsurancePlanId)
                            .to(InsurancePlans::Table, InsurancePlans::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Blacklist::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blacklist::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Blacklist::EmailAddress)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Blacklist::Reason).string().null())
                    .col(
                        ColumnDef::new(Blacklist::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first
        manager
            .drop_table(Table::drop().table(Blacklist::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Insurances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InsurancePlans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Customers {
    Table,
    Id,
    CustomerName,
    EmailAddress,
    PasswordHash,
    CreatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    CustomerId,
    Activated,
    UpdatedAt,
}

#[derive(Iden)]
enum InsurancePlans {
    Table,
    Id,
    InsurancePlanName,
}

#[derive(Iden)]
enum Insurances {
    Table,
    Id,
    InsuredAmount,
    CustomerId,
    InsurancePlanId,
}

#[derive(Iden)]
enum Blacklist {
    Table,
    Id,
    EmailAddress,
    Reason,
    CreatedAt,
}
