use crate::{
    auth::{CredentialService, LoginRequest, RegisterRequest, TokenService, SESSION_COOKIE},
    error::AppError,
};
use actix_web::{
    cookie::{time, Cookie},
    post, web, HttpResponse, Responder,
};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Stores the email with a bcrypt hash of the password. A taken email or an invalid
/// payload is a `400 Bad Request`.
#[post("/register")]
pub async fn register(
    credentials: web::Data<CredentialService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    credentials
        .register(&register_data.email, &register_data.password)
        .await
        .map_err(AppError::into_bad_request)?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Register Successful"
    })))
}

/// Login user
///
/// Checks the credentials and hands out the session token as an `HttpOnly` cookie named
/// `jwt`, valid for 72 hours.
#[post("/login")]
pub async fn login(
    credentials: web::Data<CredentialService>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = match credentials
        .authenticate(&login_data.email, &login_data.password)
        .await
    {
        Ok(user) => user,
        Err(err) => {
            log::warn!("failed login attempt: {}", err);
            return Err(err);
        }
    };

    let token = tokens.issue_token(user.id)?;
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(tokens.ttl().num_seconds()))
        .finish();

    log::info!("user {} logged in", user.id);
    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "message": "Login successful!"
    })))
}
