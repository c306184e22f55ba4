#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    test, web, App,
};
use bookshelf::auth::{CredentialService, TokenService, SESSION_COOKIE};
use bookshelf::routes;
use bookshelf::store::{BookStore, MemoryBookStore, MemoryUserStore};
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"integration_test_secret";
pub const TEST_BCRYPT_COST: u32 = 4;

/// Shared state behind one test app, kept around so tests can inspect the stores.
pub struct TestContext {
    pub books: Arc<MemoryBookStore>,
    pub credentials: web::Data<CredentialService>,
    pub tokens: web::Data<TokenService>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            books: Arc::new(MemoryBookStore::new()),
            credentials: web::Data::new(CredentialService::new(
                Arc::new(MemoryUserStore::new()),
                TEST_BCRYPT_COST,
            )),
            tokens: web::Data::new(TokenService::new(TEST_SECRET)),
        }
    }

    pub async fn app(
        &self,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        self.app_with_books(self.books.clone()).await
    }

    /// Same app, but backed by another book store. Accounts still live in this context.
    pub async fn app_with_books(
        &self,
        books: Arc<dyn BookStore>,
    ) -> impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    > {
        test::init_service(
            App::new()
                .app_data(web::Data::from(books))
                .app_data(self.credentials.clone())
                .app_data(self.tokens.clone())
                .configure(routes::config),
        )
        .await
    }
}

/// Registers a user through the API, logs in and returns the session cookie.
pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "registration failed: {}", resp.status());

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "login failed: {}", resp.status());

    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
        .expect("login did not set the session cookie")
}
