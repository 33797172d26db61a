use crate::config::config::AppConfig;
use crate::observability::AppMetrics;
use crate::services::chat::{ChatService, create_chat_service};
use crate::services::reply::SimulatedReplyGenerator;
use crate::services::user::{UserService, create_user_service};
use crate::storage::Storage;
use crate::storage::repository::CourseRepository;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Chat service for chats and their conversations
    pub chat_service: Arc<dyn ChatService>,
    /// User service for profile CRUD operations
    pub user_service: Arc<dyn UserService>,
    /// Read-only course catalogue
    pub course_repository: Arc<dyn CourseRepository>,
    /// Prometheus metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("user_service", &"Arc<dyn UserService>")
            .field("course_repository", &"Arc<dyn CourseRepository>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        chat_service: Arc<dyn ChatService>,
        user_service: Arc<dyn UserService>,
        course_repository: Arc<dyn CourseRepository>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            chat_service,
            user_service,
            course_repository,
            metrics,
        }
    }

    /// Wire services over a storage bundle
    pub fn from_storage(storage: &Storage, config: &AppConfig, metrics: Arc<AppMetrics>) -> Self {
        let replies = Arc::new(SimulatedReplyGenerator::new(
            config.chat.simulated_reply.clone(),
        ));
        let chat_service = create_chat_service(
            storage.chats.clone(),
            storage.messages.clone(),
            replies,
            config.memory.window_size,
        );
        let user_service = create_user_service(storage.users.clone());

        Self::new(
            chat_service,
            user_service,
            storage.courses.clone(),
            metrics,
        )
    }
}
