//! 用户 DTO

use serde::Deserialize;
use validator::Validate;

use crate::services::user::NewUser;

/// 创建用户请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CreateUserRequest {
    #[validate(required(message = "Missing required field: name"))]
    pub name: Option<String>,
    #[validate(
        required(message = "Missing required field: email"),
        email(message = "Invalid email address")
    )]
    pub email: Option<String>,
    pub grad_year: Option<u16>,
    pub concentration: Option<String>,
    pub certificates: Vec<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            name: request.name.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            grad_year: request.grad_year,
            concentration: request.concentration,
            certificates: request.certificates,
        }
    }
}

/// 按邮箱查询
#[derive(Debug, Deserialize)]
pub struct UserLookupParams {
    pub email: String,
}

/// 更新专业方向请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateConcentrationRequest {
    #[validate(required(message = "Missing required field: concentration"))]
    pub concentration: Option<String>,
}

/// 更新证书请求
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateCertificatesRequest {
    #[validate(required(message = "Missing required field: certificates"))]
    pub certificates: Option<Vec<String>>,
}
