use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 用户档案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// 用户唯一标识
    pub id: String,

    /// 姓名
    pub name: String,

    /// 邮箱（唯一）
    pub email: String,

    /// 毕业年份
    #[serde(default)]
    pub grad_year: Option<u16>,

    /// 专业方向
    #[serde(default)]
    pub concentration: Option<String>,

    /// 证书项目
    #[serde(default)]
    pub certificates: Vec<String>,

    /// 创建时间
    pub created_at: DateTime<Utc>,
}

impl User {
    /// 创建新用户
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            grad_year: None,
            concentration: None,
            certificates: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
