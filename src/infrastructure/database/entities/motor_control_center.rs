//! Motor-control-center entity

use async_trait::async_trait;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::shared::slugify;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "motor_control_centers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// One of `MCC-1` .. `MCC-11`
    pub name: String,

    /// Always `slugify(name)`
    #[sea_orm(unique)]
    pub slug: String,

    pub substation_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::substation::Entity",
        from = "Column::SubstationId",
        to = "super::substation::Column::Id",
        on_delete = "Restrict"
    )]
    Substation,
    #[sea_orm(has_many = "super::node::Entity")]
    Nodes,
}

impl Related<super::substation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Substation.def()
    }
}

impl Related<super::node::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nodes.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Recompute the slug from the name on every insert and update.
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let Some(name) = self.name.try_as_ref() {
            let slug = slugify(name);
            self.slug = Set(slug);
        }
        Ok(self)
    }
}
