use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{NewUser, Permission, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: NewUser) -> DomainResult<User>;
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn set_permissions(&self, id: &str, permissions: BTreeSet<Permission>) -> DomainResult<User>;
    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
}
