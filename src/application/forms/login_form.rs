use serde::{Deserialize, Serialize};

use crate::shared::{FieldErrors, REQUIRED};

pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const INACTIVE: &str = "This account is inactive.";

pub const FIELDS: [(&str, &str); 2] = [("username", "Логін"), ("password", "Пароль")];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Where to go after a successful login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl LoginForm {
    /// Required-field checks; credentials are verified by the account service.
    pub fn clean(&self) -> Result<(&str, &str), FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result()?;
        Ok((username, self.password.as_str()))
    }

    /// Only local absolute paths are followed.
    pub fn redirect_target(&self) -> String {
        match self.next.as_deref() {
            Some(next) if next.starts_with('/') && !next.starts_with("//") => next.to_string(),
            _ => "/".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields() {
        let form = LoginForm {
            password: "password".into(),
            ..Default::default()
        };
        assert!(form.clean().unwrap_err().contains("username"));

        let form = LoginForm {
            username: "testuser".into(),
            ..Default::default()
        };
        assert!(form.clean().unwrap_err().contains("password"));
    }

    #[test]
    fn next_must_be_local() {
        let mut form = LoginForm::default();
        assert_eq!(form.redirect_target(), "/");
        form.next = Some("/search/".into());
        assert_eq!(form.redirect_target(), "/search/");
        form.next = Some("//evil.example".into());
        assert_eq!(form.redirect_target(), "/");
        form.next = Some("https://evil.example".into());
        assert_eq!(form.redirect_target(), "/");
    }
}
