//! User use-case service.
//!
//! # Responsibility
//! - Register users and turn a user name into a [`Session`].
//! - Delegate persistence to repository implementations.

use crate::model::user::{Session, User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::service::{ServiceError, ServiceResult};
use std::collections::BTreeMap;

/// Use-case service wrapper for user operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers `name` (or resolves the existing user) and opens a session.
    pub fn register(&self, name: &str) -> ServiceResult<Session> {
        let id = self.repo.create_user(name)?;
        let user = self
            .repo
            .get_user(id)?
            .ok_or(ServiceError::InconsistentState(
                "registered user not found in read-back",
            ))?;
        Ok(Session::new(user))
    }

    /// Opens a session for an already registered user.
    pub fn select(&self, name: &str) -> ServiceResult<Session> {
        self.repo
            .find_user_by_name(name)?
            .map(Session::new)
            .ok_or_else(|| ServiceError::UnknownUser(name.trim().to_string()))
    }

    /// Lists users ordered by id, e.g. for positional menu display.
    pub fn list_users(&self) -> ServiceResult<BTreeMap<UserId, String>> {
        Ok(self.repo.list_users()?)
    }

    pub fn get_user(&self, id: UserId) -> ServiceResult<Option<User>> {
        Ok(self.repo.get_user(id)?)
    }

    /// Removes a user and all of their movies.
    pub fn remove_user(&self, id: UserId) -> ServiceResult<bool> {
        Ok(self.repo.delete_user(id)?)
    }
}
