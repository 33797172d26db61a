#[cfg(test)]
mod chat_handler_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::AppConfig;
    use crate::observability::AppMetrics;
    use crate::storage::Storage;

    fn app() -> Router {
        let storage = Storage::in_memory();
        let metrics = Arc::new(AppMetrics::new().unwrap());
        create_router(AppState::from_storage(&storage, &AppConfig::in_memory(), metrics))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_create_chat_returns_201() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/v1/chats", Some(json!({"user_id": "u1"}))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user_id"], "u1");
        assert!(body["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_chat_requires_user() {
        let app = app();
        let (status, body) = call(&app, "POST", "/api/v1/chats", Some(json!({"user_id": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_send_message_flow() {
        let app = app();
        let (_, chat) = call(&app, "POST", "/api/v1/chats", Some(json!({"user_id": "u1"}))).await;
        let chat_id = chat["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/v1/chats/{}/messages", chat_id),
            Some(json!({"user_id": "u1", "content": "Which COS courses have no P/D/F?"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            body["model_message"],
            "This is a simulated response. The backend integration will be added later!"
        );

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/v1/chats/{}/messages?limit=1", chat_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["messages"][0]["type"], "ai");

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/v1/chats/{}/messages?limit={}", chat_id, usize::MAX),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);

        let (_, summary) = call(&app, "GET", &format!("/api/v1/chats/{}/summary", chat_id), None).await;
        assert_eq!(summary["message_count"], 2);
        assert_eq!(summary["uuid"], "u1");

        let (status, transcript) = call(&app, "GET", &format!("/api/v1/chats/{}", chat_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(transcript["messages"].as_array().unwrap().len(), 2);
        assert_eq!(transcript["messages"][0]["type"], "human");
    }

    #[tokio::test]
    async fn test_send_message_to_missing_chat_returns_404() {
        let app = app();
        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/chats/missing/messages",
            Some(json!({"user_id": "u1", "content": "hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_and_delete_chats() {
        let app = app();
        call(&app, "POST", "/api/v1/chats", Some(json!({"user_id": "u1"}))).await;
        let (_, chat) = call(&app, "POST", "/api/v1/chats", Some(json!({"user_id": "u1"}))).await;
        call(&app, "POST", "/api/v1/chats", Some(json!({"user_id": "u2"}))).await;

        let (status, list) = call(&app, "GET", "/api/v1/chats?user_id=u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 2);

        let uri = format!("/api/v1/chats/{}", chat["id"].as_str().unwrap());
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[cfg(test)]
mod user_handler_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::AppConfig;
    use crate::observability::AppMetrics;
    use crate::storage::Storage;

    fn app() -> Router {
        let metrics = Arc::new(AppMetrics::new().unwrap());
        create_router(AppState::from_storage(
            &Storage::in_memory(),
            &AppConfig::in_memory(),
            metrics,
        ))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_create_user_validation() {
        let app = app();
        let (status, _) = send(&app, "POST", "/api/v1/users", json!({"email": "a@b.edu"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/api/v1/users", json!({"name": "Ada"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/users",
            json!({"name": "Ada", "email": "not-an-email"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let app = app();
        let (status, user) = send(
            &app,
            "POST",
            "/api/v1/users",
            json!({"name": "Ada", "email": "ada@princeton.edu", "grad_year": 2026}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = user["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/users",
            json!({"name": "Other", "email": "ADA@princeton.edu"}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, found) = send(
            &app,
            "GET",
            "/api/v1/users?email=ada@princeton.edu",
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["id"], id.as_str());

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/users/{}/concentration", id),
            json!({"concentration": "COS"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["concentration"], "COS");

        let (status, updated) = send(
            &app,
            "PATCH",
            &format!("/api/v1/users/{}/certificates", id),
            json!({"certificates": ["SML", "Finance"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["certificates"], json!(["SML", "Finance"]));

        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/v1/users/{}/certificates", id),
            json!({}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/users/{}", id), Value::Null).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/v1/users/{}", id), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[cfg(test)]
mod course_handler_tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::AppConfig;
    use crate::models::course::{Course, Semester};
    use crate::observability::AppMetrics;
    use crate::storage::Storage;

    async fn seeded_app() -> Router {
        let storage = Storage::in_memory();
        for code in [1222, 1232] {
            storage
                .courses
                .insert_semester(&Semester {
                    code,
                    ..Default::default()
                })
                .await
                .unwrap();
            storage
                .courses
                .insert_course(&Course {
                    course_id: "002051".into(),
                    semester: code,
                    title: format!("Algorithms {}", code),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let metrics = Arc::new(AppMetrics::new().unwrap());
        create_router(AppState::from_storage(&storage, &AppConfig::in_memory(), metrics))
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_course_catalogue() {
        let app = seeded_app().await;

        let (status, body) = get(&app, "/api/v1/semesters").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["semesters"][0]["code"], 1232);

        let (_, body) = get(&app, "/api/v1/semesters/1222/courses").await;
        assert_eq!(body["count"], 1);

        let (_, body) = get(&app, "/api/v1/courses/002051").await;
        assert_eq!(body["title"], "Algorithms 1232");

        let (_, body) = get(&app, "/api/v1/courses/002051?semester=1222").await;
        assert_eq!(body["title"], "Algorithms 1222");

        let (status, _) = get(&app, "/api/v1/courses/999999?semester=1222").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[cfg(test)]
mod storage_error_metric_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::config::config::AppConfig;
    use crate::error::AppError;
    use crate::observability::AppMetrics;
    use crate::services::user::create_user_service;
    use crate::storage::Storage;
    use crate::storage::repository::{MockCourseRepository, MockUserRepository};

    fn failing_app(metrics: Arc<AppMetrics>) -> Router {
        let mut users = MockUserRepository::new();
        users
            .expect_get_by_id()
            .returning(|id| Err(AppError::storage(format!("user:{}", id), "down")));

        let mut courses = MockCourseRepository::new();
        courses
            .expect_list_semesters()
            .returning(|| Err(AppError::storage("semester", "down")));

        let base = AppState::from_storage(
            &Storage::in_memory(),
            &AppConfig::in_memory(),
            metrics.clone(),
        );
        create_router(AppState::new(
            base.chat_service,
            create_user_service(Arc::new(users)),
            Arc::new(courses),
            metrics,
        ))
    }

    async fn status_of(app: &Router, uri: &str) -> StatusCode {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_user_and_course_storage_errors_are_counted() {
        let metrics = Arc::new(AppMetrics::new().unwrap());
        let app = failing_app(metrics.clone());

        assert_eq!(
            status_of(&app, "/api/v1/users/u1").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(&app, "/api/v1/semesters").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(&app, "/api/v1/courses/002051").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );

        assert_eq!(metrics.storage_errors_total.get(), 3);
        assert_eq!(metrics.http_errors_total.get(), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_a_storage_error() {
        let metrics = Arc::new(AppMetrics::new().unwrap());
        let app = create_router(AppState::from_storage(
            &Storage::in_memory(),
            &AppConfig::in_memory(),
            metrics.clone(),
        ));

        assert_eq!(status_of(&app, "/api/v1/users/missing").await, StatusCode::NOT_FOUND);
        assert_eq!(metrics.storage_errors_total.get(), 0);
    }
}
