//! 进程内存储
//!
//! 与 SurrealDB 实现遵守相同的契约，供测试和 `memory` 后端使用。
//! 单个文档的修改通过 DashMap 的分片锁完成，保证单文档原子性。

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{AppError, Result};
use crate::models::chat::Chat;
use crate::models::conversation::{ConversationKey, StoredConversation};
use crate::models::course::{Course, Semester};
use crate::models::message::Message;
use crate::models::user::User;
use crate::storage::message_store::MessageStore;
use crate::storage::repository::{ChatRepository, CourseRepository, UserRepository};

/// 内存消息存储
#[derive(Default)]
pub struct InMemoryMessageStore {
    documents: DashMap<ConversationKey, StoredConversation>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前会话文档数
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append_message(&self, key: &ConversationKey, message: &Message) -> Result<()> {
        self.documents
            .entry(key.clone())
            .and_modify(|doc| doc.push(message.clone()))
            .or_insert_with(|| StoredConversation::first(key, message.clone()));
        Ok(())
    }

    async fn read_tail(&self, key: &ConversationKey, limit: usize) -> Result<Vec<Message>> {
        Ok(self
            .documents
            .get(key)
            .map(|doc| doc.tail(limit).to_vec())
            .unwrap_or_default())
    }

    async fn read_full(&self, key: &ConversationKey) -> Result<Option<StoredConversation>> {
        Ok(self.documents.get(key).map(|doc| doc.value().clone()))
    }

    async fn delete(&self, key: &ConversationKey) -> Result<bool> {
        Ok(self.documents.remove(key).is_some())
    }
}

/// 内存用户仓储
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        if self.users.contains_key(&user.id) {
            return Err(AppError::storage(
                format!("user:{}", user.id),
                "record already exists",
            ));
        }
        self.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| entry.value().clone()))
    }

    async fn set_concentration(&self, id: &str, concentration: &str) -> Result<Option<User>> {
        Ok(self.users.get_mut(id).map(|mut user| {
            user.concentration = Some(concentration.to_string());
            user.value().clone()
        }))
    }

    async fn set_certificates(&self, id: &str, certificates: &[String]) -> Result<Option<User>> {
        Ok(self.users.get_mut(id).map(|mut user| {
            user.certificates = certificates.to_vec();
            user.value().clone()
        }))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.users.remove(id).is_some())
    }
}

/// 内存聊天仓储
#[derive(Default)]
pub struct InMemoryChatRepository {
    chats: DashMap<String, Chat>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create(&self, chat: &Chat) -> Result<Chat> {
        self.chats.insert(chat.id.clone(), chat.clone());
        Ok(chat.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Chat>> {
        Ok(self.chats.get(id).map(|c| c.value().clone()))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Chat>> {
        let mut chats: Vec<Chat> = self
            .chats
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        chats.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(chats)
    }

    async fn touch(&self, id: &str) -> Result<()> {
        if let Some(mut chat) = self.chats.get_mut(id) {
            chat.touch();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.chats.remove(id).is_some())
    }
}

/// 内存课程仓储
#[derive(Default)]
pub struct InMemoryCourseRepository {
    semesters: DashMap<u32, Semester>,
    courses: DashMap<(String, u32), Course>,
}

impl InMemoryCourseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseRepository for InMemoryCourseRepository {
    async fn semester_exists(&self, code: u32) -> Result<bool> {
        Ok(self.semesters.contains_key(&code))
    }

    async fn insert_semester(&self, semester: &Semester) -> Result<()> {
        self.semesters.insert(semester.code, semester.clone());
        Ok(())
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>> {
        let mut semesters: Vec<Semester> =
            self.semesters.iter().map(|s| s.value().clone()).collect();
        semesters.sort_by(|a, b| b.code.cmp(&a.code));
        Ok(semesters)
    }

    async fn course_exists(&self, course_id: &str, semester: u32) -> Result<bool> {
        Ok(self
            .courses
            .contains_key(&(course_id.to_string(), semester)))
    }

    async fn insert_course(&self, course: &Course) -> Result<()> {
        self.courses.insert(course.merge_key(), course.clone());
        Ok(())
    }

    async fn get_course(&self, course_id: &str, semester: u32) -> Result<Option<Course>> {
        Ok(self
            .courses
            .get(&(course_id.to_string(), semester))
            .map(|c| c.value().clone()))
    }

    async fn list_courses(&self, semester: u32) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .courses
            .iter()
            .filter(|entry| entry.semester == semester)
            .map(|entry| entry.value().clone())
            .collect();
        courses.sort_by(|a, b| a.course_id.cmp(&b.course_id));
        Ok(courses)
    }
}
