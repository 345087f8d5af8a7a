use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error, ResponseError,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{errors::AppError, settings::AppConfig, AppState};

/// Username and password accepted on `/admin` routes.
#[derive(Clone)]
pub struct AdminCredentials {
    user: String,
    pass: Zeroizing<String>,
}

impl AdminCredentials {
    pub fn new(user: &str, pass: &str) -> Self {
        AdminCredentials {
            user: user.to_string(),
            pass: Zeroizing::new(pass.to_string()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.admin_user, &config.admin_pass)
    }

    pub fn matches(&self, user: &str, pass: &str) -> bool {
        let user_ok = self.user.as_bytes().ct_eq(user.as_bytes());
        let pass_ok = self.pass.as_bytes().ct_eq(pass.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("user", &self.user)
            .field("pass", &"[REDACTED]")
            .finish()
    }
}

/// HTTP Basic gate. Mounted on the `/admin` scope, so every request it sees needs credentials.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Preflight carries no credentials
            if req.method() == Method::OPTIONS {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>() else {
                tracing::error!("AppState missing in middleware");
                return Ok(custom_error_response(
                    req,
                    AppError::InternalError("AppState missing".into()),
                ));
            };

            let authorized = extract_basic_credentials(&req)
                .is_some_and(|(user, pass)| state.admin.matches(&user, &pass));

            if !authorized {
                tracing::warn!(path = %req.path(), "Rejected admin request");
                return Ok(custom_error_response(req, AppError::Unauthorized));
            }

            service.call(req).await
        })
    }
}

/// Decodes `Authorization: Basic base64(user:pass)`. The password may itself contain `:`.
fn extract_basic_credentials(req: &ServiceRequest) -> Option<(String, Zeroizing<String>)> {
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = Zeroizing::new(BASE64.decode(encoded.trim()).ok()?);
    let decoded = std::str::from_utf8(&decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;

    Some((user.to_string(), Zeroizing::new(pass.to_string())))
}

fn custom_error_response(req: ServiceRequest, err: AppError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}
