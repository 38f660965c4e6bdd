#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use blog_service::configure_routes;
use blog_service::handlers::json_config;
use blog_service::models::{Group, NewGroup, User};
use blog_service::repository::{BlogRepository, InMemoryRepository};
use jwt_security::JwtManager;
use std::sync::Arc;

pub const TEST_SECRET: &str = "k7Vq9zR2mX4pL8wN3tB6yH1cJ5fD0gSa";

/// In-memory repository plus a token issuer with the test secret
pub struct TestContext {
    pub repo: Arc<dyn BlogRepository>,
    pub jwt: Arc<JwtManager>,
}

/// A seeded user and a valid bearer header value for it
pub struct TestUser {
    pub user: User,
    pub bearer: String,
}

impl TestUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn auth(&self) -> (&'static str, String) {
        ("Authorization", self.bearer.clone())
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            repo: Arc::new(InMemoryRepository::new()),
            jwt: Arc::new(JwtManager::new(TEST_SECRET, 3600, false).expect("jwt manager")),
        }
    }

    pub async fn user(&self, username: &str) -> TestUser {
        let user = self.repo.create_user(username).await.expect("create user");
        let token = self
            .jwt
            .generate_access_token(user.id, &user.username)
            .expect("issue token");
        TestUser {
            user,
            bearer: format!("Bearer {}", token),
        }
    }

    /// Bearer header for an arbitrary identity, existing or not
    pub fn auth_as(&self, user_id: i64, username: &str) -> (&'static str, String) {
        let token = self
            .jwt
            .generate_access_token(user_id, username)
            .expect("issue token");
        ("Authorization", format!("Bearer {}", token))
    }

    pub async fn group(&self, title: &str, slug: &str) -> Group {
        self.repo
            .create_group(&NewGroup {
                title: title.into(),
                slug: slug.into(),
                description: format!("{} group", title),
            })
            .await
            .expect("create group")
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let jwt = self.jwt.clone();
        App::new()
            .app_data(web::Data::new(self.repo.clone()))
            .app_data(json_config())
            .configure(move |cfg| configure_routes(cfg, jwt))
    }
}
