use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::db_err;
use crate::domain::user::{NewUser, Permission, User, UserRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{user, user_permission};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_permissions(&self, user_id: &str) -> DomainResult<BTreeSet<Permission>> {
        let grants = user_permission::Entity::find()
            .filter(user_permission::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(grants_to_permissions(grants))
    }

    async fn with_permissions(&self, model: user::Model) -> DomainResult<User> {
        let permissions = self.load_permissions(&model.id).await?;
        Ok(user_model_to_domain(model, permissions))
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn grants_to_permissions(grants: Vec<user_permission::Model>) -> BTreeSet<Permission> {
    grants
        .into_iter()
        .filter_map(|g| match g.codename.parse() {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Ignoring grant for user {}: {}", g.user_id, e);
                None
            }
        })
        .collect()
}

fn user_model_to_domain(model: user::Model, permissions: BTreeSet<Permission>) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        is_active: model.is_active,
        is_staff: model.is_staff,
        is_superuser: model.is_superuser,
        permissions,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create_user(&self, new: NewUser) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();

        let txn = self.db.begin().await.map_err(db_err)?;

        let model = user::ActiveModel {
            id: Set(id.clone()),
            username: Set(new.username.clone()),
            password_hash: Set(new.password_hash),
            is_active: Set(true),
            is_staff: Set(new.is_staff),
            is_superuser: Set(new.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(|e| match db_err(e) {
            DomainError::Conflict(_) => {
                DomainError::Conflict(format!("Username {} already exists", new.username))
            }
            other => other,
        })?;

        for perm in &new.permissions {
            user_permission::ActiveModel {
                user_id: Set(id.clone()),
                codename: Set(perm.codename()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        info!("User {} created", model.username);
        Ok(user_model_to_domain(model, new.permissions))
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut users = Vec::with_capacity(models.len());
        for model in models {
            users.push(self.with_permissions(model).await?);
        }
        Ok(users)
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(m) => Ok(Some(self.with_permissions(m).await?)),
            None => Ok(None),
        }
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(m) => Ok(Some(self.with_permissions(m).await?)),
            None => Ok(None),
        }
    }

    async fn set_permissions(
        &self,
        id: &str,
        permissions: BTreeSet<Permission>,
    ) -> DomainResult<User> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;

        let txn = self.db.begin().await.map_err(db_err)?;
        user_permission::Entity::delete_many()
            .filter(user_permission::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        for perm in &permissions {
            user_permission::ActiveModel {
                user_id: Set(id.to_string()),
                codename: Set(perm.codename()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(db_err)?;
        }
        txn.commit().await.map_err(db_err)?;

        info!("Permissions of user {} replaced ({} grants)", model.username, permissions.len());
        Ok(user_model_to_domain(model, permissions))
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("User", "id", id))?;

        let now = Utc::now();
        let mut active: user::ActiveModel = model.into();
        active.last_login_at = Set(Some(now));
        active.updated_at = Set(now);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::migrated_db;

    fn new_user(username: &str, permissions: &[Permission]) -> NewUser {
        NewUser {
            username: username.into(),
            password_hash: "x".into(),
            is_staff: false,
            is_superuser: false,
            permissions: permissions.iter().copied().collect(),
        }
    }

    #[tokio::test]
    async fn create_and_load_with_permissions() {
        let repo = SeaOrmUserRepository::new(migrated_db().await);
        let created = repo
            .create_user(new_user("operator", &[Permission::ADD_NODE]))
            .await
            .unwrap();

        let loaded = repo.get_user_by_username("operator").await.unwrap().unwrap();
        assert_eq!(loaded.id, created.id);
        assert!(loaded.has_perm(Permission::ADD_NODE));
        assert!(!loaded.has_perm(Permission::VIEW_NODE));
        assert!(repo.get_user_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let repo = SeaOrmUserRepository::new(migrated_db().await);
        repo.create_user(new_user("a", &[])).await.unwrap();
        let err = repo.create_user(new_user("a", &[])).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)), "{err:?}");
    }

    #[tokio::test]
    async fn permissions_are_replaced() {
        let repo = SeaOrmUserRepository::new(migrated_db().await);
        let u = repo
            .create_user(new_user("a", &[Permission::ADD_NODE]))
            .await
            .unwrap();

        let updated = repo
            .set_permissions(&u.id, [Permission::VIEW_NODE].into_iter().collect())
            .await
            .unwrap();
        assert!(updated.has_perm(Permission::VIEW_NODE));

        let reloaded = repo.get_user_by_id(&u.id).await.unwrap().unwrap();
        assert!(!reloaded.has_perm(Permission::ADD_NODE));
        assert!(reloaded.has_perm(Permission::VIEW_NODE));

        repo.touch_last_login(&u.id).await.unwrap();
        let reloaded = repo.get_user_by_id(&u.id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());
    }
}
