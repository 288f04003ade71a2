//! Insurance entity linking a customer to a plan with an insured amount.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "insurances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub insured_amount: i64,
    pub customer_id: Uuid,
    pub insurance_plan_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::insurance_plan::Entity",
        from = "Column::InsurancePlanId",
        to = "super::insurance_plan::Column::Id"
    )]
    InsurancePlan,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::insurance_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InsurancePlan.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
