//! Blacklisted email entity.

use sea_orm::entity::prelude::*;

use crate::domain::BlacklistEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blacklist")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email_address: String,
    pub reason: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BlacklistEntry {
    fn from(model: Model) -> Self {
        BlacklistEntry {
            id: model.id,
            email_address: model.email_address,
            reason: model.reason,
            created_at: model.created_at,
        }
    }
}
