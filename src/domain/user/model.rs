//! User domain entity

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::permission::Permission;

#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub permissions: BTreeSet<Permission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Superusers hold every permission; inactive accounts hold none.
    pub fn has_perm(&self, perm: Permission) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_superuser || self.permissions.contains(&perm)
    }

    pub fn can_use_back_office(&self) -> bool {
        self.is_active && (self.is_staff || self.is_superuser)
    }

    /// Permissions in effect, superuser expanded
    pub fn effective_permissions(&self) -> BTreeSet<Permission> {
        if !self.is_active {
            BTreeSet::new()
        } else if self.is_superuser {
            Permission::all().collect()
        } else {
            self.permissions.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub permissions: BTreeSet<Permission>,
}
