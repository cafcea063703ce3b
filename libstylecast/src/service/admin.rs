//! Admin dashboard data
//!
//! Both listings require an admin account; the backend answers 403
//! otherwise, surfaced as `GatewayError::Forbidden`.

use std::sync::Arc;

use super::auth::AuthService;
use super::history::HistoryQuery;
use crate::error::Result;
use crate::gateway::BackendGateway;
use crate::types::{Transformation, User};

/// Client-side filter over the user list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    /// Case-insensitive substring matched against username and email
    pub search: Option<String>,
    pub admins_only: bool,
    pub limit: Option<usize>,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        if self.admins_only && !user.is_admin {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => {
                let needle = search.to_lowercase();
                user.username.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        let matching = users.into_iter().filter(|u| self.matches(u));
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}

/// Everything the admin dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminDashboard {
    pub users: Vec<User>,
    pub transformations: Vec<Transformation>,
}

#[derive(Clone)]
pub struct AdminService {
    gateway: Arc<dyn BackendGateway>,
    auth: AuthService,
}

impl AdminService {
    pub fn new(gateway: Arc<dyn BackendGateway>, auth: AuthService) -> Self {
        Self { gateway, auth }
    }

    pub async fn users(&self, query: &UserQuery) -> Result<Vec<User>> {
        let users = self
            .gateway
            .admin_users()
            .await
            .map_err(|e| self.auth.check_expired(e))?;
        Ok(query.apply(users))
    }

    pub async fn transformations(&self, query: &HistoryQuery) -> Result<Vec<Transformation>> {
        let rows = self
            .gateway
            .admin_transformations()
            .await
            .map_err(|e| self.auth.check_expired(e))?;
        Ok(query.apply(rows))
    }

    /// Fetch both listings concurrently; either failure fails the whole load
    pub async fn dashboard(&self) -> Result<AdminDashboard> {
        let (users, transformations) = futures::try_join!(
            self.gateway.admin_users(),
            self.gateway.admin_transformations()
        )
        .map_err(|e| self.auth.check_expired(e))?;

        tracing::debug!(
            users = users.len(),
            transformations = transformations.len(),
            "Loaded admin dashboard"
        );
        Ok(AdminDashboard {
            users,
            transformations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, username: &str, email: &str, is_admin: bool) -> User {
        User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            is_admin,
            created_at: None,
        }
    }

    fn users() -> Vec<User> {
        vec![
            user(1, "admin", "root@example.com", true),
            user(2, "alice", "alice@example.com", false),
            user(3, "bob", "bob@corp.test", false),
        ]
    }

    #[test]
    fn test_search_username_or_email() {
        let query = UserQuery {
            search: Some("CORP".to_string()),
            ..Default::default()
        };
        let result = query.apply(users());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].username, "bob");

        let query = UserQuery {
            search: Some("ali".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(users())[0].id, 2);
    }

    #[test]
    fn test_admins_only() {
        let query = UserQuery {
            admins_only: true,
            ..Default::default()
        };
        let result = query.apply(users());
        assert_eq!(result.len(), 1);
        assert!(result[0].is_admin);
    }

    #[test]
    fn test_limit() {
        let query = UserQuery {
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(query.apply(users()).len(), 1);
    }
}
