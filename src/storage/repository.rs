use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::chat::Chat;
use crate::models::course::{Course, Semester};
use crate::models::user::User;
use crate::storage::surrealdb::{SELECT_WITH_ID, SurrealPool, content_without_id};

/// 用户仓储 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户
    async fn create(&self, user: &User) -> Result<User>;

    /// 根据 ID 获取用户
    async fn get_by_id(&self, id: &str) -> Result<Option<User>>;

    /// 根据邮箱获取用户
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// 更新专业方向，返回更新后的用户
    async fn set_concentration(&self, id: &str, concentration: &str) -> Result<Option<User>>;

    /// 覆盖证书列表，返回更新后的用户
    async fn set_certificates(&self, id: &str, certificates: &[String]) -> Result<Option<User>>;

    /// 删除用户
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// 聊天仓储 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// 创建聊天
    async fn create(&self, chat: &Chat) -> Result<Chat>;

    /// 根据 ID 获取聊天
    async fn get_by_id(&self, id: &str) -> Result<Option<Chat>>;

    /// 列出用户的聊天，最新的在前
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Chat>>;

    /// 刷新最后活跃时间
    async fn touch(&self, id: &str) -> Result<()>;

    /// 删除聊天
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// 课程仓储 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn semester_exists(&self, code: u32) -> Result<bool>;

    async fn insert_semester(&self, semester: &Semester) -> Result<()>;

    /// 列出学期，新学期在前
    async fn list_semesters(&self) -> Result<Vec<Semester>>;

    async fn course_exists(&self, course_id: &str, semester: u32) -> Result<bool>;

    async fn insert_course(&self, course: &Course) -> Result<()>;

    async fn get_course(&self, course_id: &str, semester: u32) -> Result<Option<Course>>;

    /// 列出某学期的课程，按课程号排序
    async fn list_courses(&self, semester: u32) -> Result<Vec<Course>>;
}

/// 用户仓储实现
#[derive(Clone)]
pub struct SurrealUserRepository {
    pool: SurrealPool,
}

impl SurrealUserRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }

    async fn update_field(
        &self,
        id: &str,
        field: &'static str,
        value: serde_json::Value,
    ) -> Result<Option<User>> {
        // UPDATE 对不存在的记录不生效，不会隐式创建
        let query = format!(
            "UPDATE type::thing('user', $id) SET {} = $value RETURN NONE",
            field
        );
        self.pool
            .db()
            .query(query)
            .bind(("id", id.to_string()))
            .bind(("value", value))
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::storage(format!("user:{}", id), e))?;

        self.get_by_id(id).await
    }
}

#[async_trait]
impl UserRepository for SurrealUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let content = content_without_id(user)?;
        self.pool
            .db()
            .query("CREATE type::thing('user', $id) CONTENT $content RETURN NONE")
            .bind(("id", user.id.clone()))
            .bind(("content", content))
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::storage(format!("user:{}", user.id), e))?;

        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let query = format!("{} FROM type::thing('user', $id)", SELECT_WITH_ID);
        let users: Vec<User> = self
            .pool
            .db()
            .query(query)
            .bind(("id", id.to_string()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("user:{}", id), e))?;
        Ok(users.into_iter().next())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("{} FROM user WHERE email = $email LIMIT 1", SELECT_WITH_ID);
        let users: Vec<User> = self
            .pool
            .db()
            .query(query)
            .bind(("email", email.to_string()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("user?email={}", email), e))?;
        Ok(users.into_iter().next())
    }

    async fn set_concentration(&self, id: &str, concentration: &str) -> Result<Option<User>> {
        self.update_field(id, "concentration", concentration.into())
            .await
    }

    async fn set_certificates(&self, id: &str, certificates: &[String]) -> Result<Option<User>> {
        self.update_field(id, "certificates", serde_json::to_value(certificates)?)
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let deleted: Vec<serde_json::Value> = self
            .pool
            .db()
            .query("DELETE type::thing('user', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("user:{}", id), e))?;
        Ok(!deleted.is_empty())
    }
}

/// 聊天仓储实现
#[derive(Clone)]
pub struct SurrealChatRepository {
    pool: SurrealPool,
}

impl SurrealChatRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for SurrealChatRepository {
    async fn create(&self, chat: &Chat) -> Result<Chat> {
        let content = content_without_id(chat)?;
        self.pool
            .db()
            .query("CREATE type::thing('chat', $id) CONTENT $content RETURN NONE")
            .bind(("id", chat.id.clone()))
            .bind(("content", content))
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::storage(format!("chat:{}", chat.id), e))?;

        Ok(chat.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Chat>> {
        let query = format!("{} FROM type::thing('chat', $id)", SELECT_WITH_ID);
        let chats: Vec<Chat> = self
            .pool
            .db()
            .query(query)
            .bind(("id", id.to_string()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("chat:{}", id), e))?;
        Ok(chats.into_iter().next())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Chat>> {
        let query = format!(
            "{} FROM chat WHERE user_id = $user_id ORDER BY created_at DESC",
            SELECT_WITH_ID
        );
        let chats: Vec<Chat> = self
            .pool
            .db()
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("chat?user_id={}", user_id), e))?;
        Ok(chats)
    }

    async fn touch(&self, id: &str) -> Result<()> {
        let now = serde_json::to_value(chrono::Utc::now())?;
        self.pool
            .db()
            .query("UPDATE type::thing('chat', $id) SET updated_at = $now RETURN NONE")
            .bind(("id", id.to_string()))
            .bind(("now", now))
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::storage(format!("chat:{}", id), e))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let deleted: Vec<serde_json::Value> = self
            .pool
            .db()
            .query("DELETE type::thing('chat', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("chat:{}", id), e))?;
        Ok(!deleted.is_empty())
    }
}

/// 课程仓储实现
///
/// 课程记录 ID 为 `course:[course_id, semester]`，学期记录 ID 为 `semester:<code>`。
#[derive(Clone)]
pub struct SurrealCourseRepository {
    pool: SurrealPool,
}

impl SurrealCourseRepository {
    pub fn new(pool: SurrealPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for SurrealCourseRepository {
    async fn semester_exists(&self, code: u32) -> Result<bool> {
        let found: Vec<serde_json::Value> = self
            .pool
            .db()
            .query("SELECT VALUE code FROM type::thing('semester', $code)")
            .bind(("code", code as i64))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("semester:{}", code), e))?;
        Ok(!found.is_empty())
    }

    async fn insert_semester(&self, semester: &Semester) -> Result<()> {
        self.pool
            .db()
            .query("CREATE type::thing('semester', $code) CONTENT $content RETURN NONE")
            .bind(("code", semester.code as i64))
            .bind(("content", semester.clone()))
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::storage(format!("semester:{}", semester.code), e))?;
        Ok(())
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>> {
        let semesters: Vec<Semester> = self
            .pool
            .db()
            .query("SELECT * OMIT id FROM semester ORDER BY code DESC")
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage("semester", e))?;
        Ok(semesters)
    }

    async fn course_exists(&self, course_id: &str, semester: u32) -> Result<bool> {
        let found: Vec<serde_json::Value> = self
            .pool
            .db()
            .query("SELECT VALUE course_id FROM type::thing('course', [$course_id, $semester])")
            .bind(("course_id", course_id.to_string()))
            .bind(("semester", semester as i64))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("course:{}/{}", course_id, semester), e))?;
        Ok(!found.is_empty())
    }

    async fn insert_course(&self, course: &Course) -> Result<()> {
        self.pool
            .db()
            .query(
                "CREATE type::thing('course', [$course_id, $semester]) CONTENT $content RETURN NONE",
            )
            .bind(("course_id", course.course_id.clone()))
            .bind(("semester", course.semester as i64))
            .bind(("content", course.clone()))
            .await
            .and_then(|response| response.check())
            .map_err(|e| {
                AppError::storage(format!("course:{}/{}", course.course_id, course.semester), e)
            })?;
        Ok(())
    }

    async fn get_course(&self, course_id: &str, semester: u32) -> Result<Option<Course>> {
        let courses: Vec<Course> = self
            .pool
            .db()
            .query("SELECT * OMIT id FROM type::thing('course', [$course_id, $semester])")
            .bind(("course_id", course_id.to_string()))
            .bind(("semester", semester as i64))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("course:{}/{}", course_id, semester), e))?;
        Ok(courses.into_iter().next())
    }

    async fn list_courses(&self, semester: u32) -> Result<Vec<Course>> {
        let courses: Vec<Course> = self
            .pool
            .db()
            .query("SELECT * OMIT id FROM course WHERE semester = $semester ORDER BY course_id")
            .bind(("semester", semester as i64))
            .await
            .and_then(|mut response| response.take(0))
            .map_err(|e| AppError::storage(format!("course?semester={}", semester), e))?;
        Ok(courses)
    }
}
