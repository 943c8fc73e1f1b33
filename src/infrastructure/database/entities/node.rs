//! Node (equipment unit) entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    /// Relative media path under `photos/`
    #[sea_orm(nullable)]
    pub label: Option<String>,

    pub level: String,

    pub round_per_minute: i32,

    /// Power in tenths of a unit (7.5 is stored as 75)
    pub power_tenths: i32,

    pub mcc_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::motor_control_center::Entity",
        from = "Column::MccId",
        to = "super::motor_control_center::Column::Id",
        on_delete = "Restrict"
    )]
    MotorControlCenter,
}

impl Related<super::motor_control_center::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MotorControlCenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
