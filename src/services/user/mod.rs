//! 用户服务
//!
//! 用户档案的创建、查询与字段更新。邮箱在存储前统一转为小写并保持唯一。

use async_trait::async_trait;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::storage::repository::UserRepository;

/// 新用户参数
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub grad_year: Option<u16>,
    pub concentration: Option<String>,
    pub certificates: Vec<String>,
}

/// 用户服务 trait
#[async_trait]
pub trait UserService: Send + Sync {
    /// 创建用户，邮箱重复时返回冲突
    async fn create(&self, new_user: NewUser) -> Result<User>;

    async fn get(&self, id: &str) -> Result<User>;

    async fn get_by_email(&self, email: &str) -> Result<User>;

    async fn update_concentration(&self, id: &str, concentration: &str) -> Result<User>;

    async fn update_certificates(&self, id: &str, certificates: Vec<String>) -> Result<User>;

    async fn delete(&self, id: &str) -> Result<bool>;
}

/// 用户服务实现
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("User not found: {}", id))
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create(&self, new_user: NewUser) -> Result<User> {
        if new_user.name.trim().is_empty() {
            return Err(AppError::Validation("Missing required field: name".to_string()));
        }
        if new_user.email.trim().is_empty() {
            return Err(AppError::Validation("Missing required field: email".to_string()));
        }

        let mut user = User::new(&new_user.name, &new_user.email);
        if !user.email.validate_email() {
            return Err(AppError::Validation(format!(
                "Invalid email address: {}",
                new_user.email
            )));
        }

        if self.repository.get_by_email(&user.email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User with email {} already exists",
                user.email
            )));
        }

        user.grad_year = new_user.grad_year;
        user.concentration = new_user.concentration;
        user.certificates = new_user.certificates;

        let user = self.repository.create(&user).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    async fn get(&self, id: &str) -> Result<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let email = email.trim().to_lowercase();
        self.repository
            .get_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with email {} not found", email)))
    }

    async fn update_concentration(&self, id: &str, concentration: &str) -> Result<User> {
        self.repository
            .set_concentration(id, concentration)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn update_certificates(&self, id: &str, certificates: Vec<String>) -> Result<User> {
        self.repository
            .set_certificates(id, &certificates)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        self.repository.delete(id).await
    }
}

/// 创建用户服务
pub fn create_user_service(repository: Arc<dyn UserRepository>) -> Arc<dyn UserService> {
    Arc::new(UserServiceImpl::new(repository))
}
