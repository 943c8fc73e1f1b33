//! Substation entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "substations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// One of `РП-4` .. `РП-8`
    pub name: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub level: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::motor_control_center::Entity")]
    MotorControlCenters,
}

impl Related<super::motor_control_center::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MotorControlCenters.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
