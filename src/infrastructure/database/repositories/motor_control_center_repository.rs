//! SeaORM implementation of MotorControlCenterRepository
//!
//! The slug column is owned by the entity's `before_save` hook.

use async_trait::async_trait;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::domain::motor_control_center::{
    MotorControlCenter, MotorControlCenterRepository, NewMotorControlCenter,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{motor_control_center, node};

pub struct SeaOrmMotorControlCenterRepository {
    db: DatabaseConnection,
}

impl SeaOrmMotorControlCenterRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn from_model(model: motor_control_center::Model) -> DomainResult<MotorControlCenter> {
    Ok(MotorControlCenter {
        id: model.id,
        name: model
            .name
            .parse()
            .map_err(|e| corrupt("motor_control_center", e))?,
        slug: model.slug,
        substation_id: model.substation_id,
    })
}

fn from_models(models: Vec<motor_control_center::Model>) -> DomainResult<Vec<MotorControlCenter>> {
    models.into_iter().map(from_model).collect()
}

#[async_trait]
impl MotorControlCenterRepository for SeaOrmMotorControlCenterRepository {
    async fn find_all(&self) -> DomainResult<Vec<MotorControlCenter>> {
        let models = motor_control_center::Entity::find()
            .order_by_asc(motor_control_center::Column::Name)
            .order_by_asc(motor_control_center::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        from_models(models)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<MotorControlCenter>> {
        motor_control_center::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> DomainResult<Option<MotorControlCenter>> {
        motor_control_center::Entity::find()
            .filter(motor_control_center::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn find_by_substation(&self, substation_id: i32) -> DomainResult<Vec<MotorControlCenter>> {
        let models = motor_control_center::Entity::find()
            .filter(motor_control_center::Column::SubstationId.eq(substation_id))
            .order_by_asc(motor_control_center::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        from_models(models)
    }

    async fn save(&self, new: NewMotorControlCenter) -> DomainResult<MotorControlCenter> {
        let model = motor_control_center::ActiveModel {
            name: Set(new.name.to_string()),
            substation_id: Set(new.substation_id),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(db_err)?;
        info!("MCC {} saved (slug={})", saved.name, saved.slug);
        from_model(saved)
    }

    async fn update(&self, mcc: MotorControlCenter) -> DomainResult<MotorControlCenter> {
        let existing = motor_control_center::Entity::find_by_id(mcc.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("MotorControlCenter", "id", mcc.id))?;

        let mut active: motor_control_center::ActiveModel = existing.into();
        active.name = Set(mcc.name.to_string());
        // overwritten in before_save
        active.slug = Set(mcc.slug);
        active.substation_id = Set(mcc.substation_id);

        let saved = active.update(&self.db).await.map_err(db_err)?;
        info!("MCC {} updated (slug={})", saved.id, saved.slug);
        from_model(saved)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let existing = motor_control_center::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("MotorControlCenter", "id", id))?;

        let dependents = node::Entity::find()
            .filter(node::Column::MccId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if dependents > 0 {
            return Err(DomainError::Protected {
                entity: "MotorControlCenter",
                value: existing.name,
                dependent_entity: "Node",
                dependents,
            });
        }

        motor_control_center::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        info!("MCC {} deleted", id);
        Ok(())
    }
}
