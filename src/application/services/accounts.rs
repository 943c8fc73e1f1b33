//! Account service: credential checks, session tokens and user management

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::application::forms::login_form::{INACTIVE, INVALID_LOGIN};
use crate::domain::user::{NewUser, Permission, User};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, verify_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};
use crate::shared::FieldErrors;

/// Issued session token
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_in: i64,
    pub user: User,
}

pub struct AccountService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repos,
            jwt_config,
            bcrypt_cost,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Check credentials. Failures are form-level errors.
    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<User> {
        let invalid = || DomainError::Invalid({
            let mut errors = FieldErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            errors
        });

        let Some(user) = self.repos.users().get_user_by_username(username).await? else {
            return Err(invalid());
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
            warn!(username, "Stored password hash is unusable: {}", e);
            false
        });
        if !valid {
            return Err(invalid());
        }

        if !user.is_active {
            return Err(DomainError::Invalid({
                let mut errors = FieldErrors::new();
                errors.add_non_field(INACTIVE);
                errors
            }));
        }

        Ok(user)
    }

    /// Authenticate and issue a session token.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<SessionToken> {
        let user = self.authenticate(username, password).await?;

        let token = create_token(&user.id, &user.username, &self.jwt_config)
            .map_err(|e| DomainError::Storage(format!("Failed to create token: {}", e)))?;
        self.repos.users().touch_last_login(&user.id).await?;
        info!(username = %user.username, "User logged in");

        Ok(SessionToken {
            token,
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Resolve a session token to an active user with fresh flags and
    /// permissions. Invalid or stale tokens resolve to `None`.
    pub async fn resolve_session(&self, token: &str) -> DomainResult<Option<User>> {
        let claims = match verify_token(token, &self.jwt_config) {
            Ok(claims) => claims,
            Err(_) => return Ok(None),
        };
        let user = self.repos.users().get_user_by_id(&claims.sub).await?;
        Ok(user.filter(|u| u.is_active))
    }

    // ── User management ─────────────────────────────────────────

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_staff: bool,
        is_superuser: bool,
        permissions: BTreeSet<Permission>,
    ) -> DomainResult<User> {
        if self.repos.users().get_user_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Username {} already exists",
                username
            )));
        }

        let password_hash = hash_password_with_cost(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Storage(format!("Failed to hash password: {}", e)))?;

        self.repos
            .users()
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
                is_staff,
                is_superuser,
                permissions,
            })
            .await
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().list_users().await
    }

    pub async fn set_permissions(
        &self,
        user_id: &str,
        permissions: BTreeSet<Permission>,
    ) -> DomainResult<User> {
        self.repos.users().set_permissions(user_id, permissions).await
    }

    /// Create the configured superuser when no accounts exist yet.
    pub async fn ensure_default_admin(&self, username: &str, password: &str) -> DomainResult<bool> {
        if !self.repos.users().list_users().await?.is_empty() {
            return Ok(false);
        }

        info!("Creating default admin user...");
        self.create_user(username, password, true, true, BTreeSet::new())
            .await?;
        info!("Default admin created: {}", username);
        warn!("Please change the admin password immediately!");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::repositories::test_support::migrated_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn service() -> AccountService {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(migrated_db().await));
        AccountService::new(repos, JwtConfig::new("test", 1), 4)
    }

    #[tokio::test]
    async fn login_and_resolve() {
        let svc = service().await;
        svc.create_user("testuser", "password", false, false, BTreeSet::new())
            .await
            .unwrap();

        let session = svc.login("testuser", "password").await.unwrap();
        let user = svc.resolve_session(&session.token).await.unwrap().unwrap();
        assert_eq!(user.username, "testuser");
        assert!(user.last_login_at.is_some());

        assert!(svc.resolve_session("garbage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_a_form_error() {
        let svc = service().await;
        svc.create_user("testuser", "password", false, false, BTreeSet::new())
            .await
            .unwrap();

        for (user, pass) in [("testuser", "nope"), ("nobody", "password")] {
            match svc.login(user, pass).await {
                Err(DomainError::Invalid(errors)) => {
                    assert_eq!(errors.non_field(), [INVALID_LOGIN])
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn default_admin_only_once() {
        let svc = service().await;
        assert!(svc.ensure_default_admin("admin", "admin").await.unwrap());
        assert!(!svc.ensure_default_admin("admin", "admin").await.unwrap());

        let admin = svc.authenticate("admin", "admin").await.unwrap();
        assert!(admin.is_superuser && admin.is_staff);
        assert!(admin.has_perm(Permission::ADD_NODE));
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let svc = service().await;
        svc.create_user("a", "pw", false, false, BTreeSet::new())
            .await
            .unwrap();
        let err = svc
            .create_user("a", "pw", false, false, BTreeSet::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
