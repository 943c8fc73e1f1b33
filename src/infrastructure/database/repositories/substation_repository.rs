//! SeaORM implementation of SubstationRepository

use async_trait::async_trait;
use log::info;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::domain::substation::{NewSubstation, Substation, SubstationRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{motor_control_center, substation};

pub struct SeaOrmSubstationRepository {
    db: DatabaseConnection,
}

impl SeaOrmSubstationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn from_model(model: substation::Model) -> DomainResult<Substation> {
    Ok(Substation {
        id: model.id,
        name: model.name.parse().map_err(|e| corrupt("substation", e))?,
        slug: model.slug,
        level: model.level.parse().map_err(|e| corrupt("substation", e))?,
    })
}

fn from_models(models: Vec<substation::Model>) -> DomainResult<Vec<Substation>> {
    models.into_iter().map(from_model).collect()
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl SubstationRepository for SeaOrmSubstationRepository {
    async fn find_all(&self) -> DomainResult<Vec<Substation>> {
        let models = substation::Entity::find()
            .order_by_asc(substation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        from_models(models)
    }

    async fn find_all_by_name(&self) -> DomainResult<Vec<Substation>> {
        let models = substation::Entity::find()
            .order_by_asc(substation::Column::Name)
            .order_by_asc(substation::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        from_models(models)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Substation>> {
        substation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(from_model)
            .transpose()
    }

    async fn save(&self, new: NewSubstation) -> DomainResult<Substation> {
        let model = substation::ActiveModel {
            name: Set(new.name.to_string()),
            slug: Set(new.slug),
            level: Set(new.level.to_string()),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(db_err)?;
        info!("Substation {} saved (id={})", saved.name, saved.id);
        from_model(saved)
    }

    async fn update(&self, s: Substation) -> DomainResult<Substation> {
        let existing = substation::Entity::find_by_id(s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Substation", "id", s.id))?;

        let mut active: substation::ActiveModel = existing.into();
        active.name = Set(s.name.to_string());
        active.slug = Set(s.slug);
        active.level = Set(s.level.to_string());

        let saved = active.update(&self.db).await.map_err(db_err)?;
        info!("Substation {} updated", saved.id);
        from_model(saved)
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let existing = substation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Substation", "id", id))?;

        let dependents = motor_control_center::Entity::find()
            .filter(motor_control_center::Column::SubstationId.eq(id))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if dependents > 0 {
            return Err(DomainError::Protected {
                entity: "Substation",
                value: existing.name,
                dependent_entity: "MotorControlCenter",
                dependents,
            });
        }

        substation::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        info!("Substation {} deleted", id);
        Ok(())
    }
}
