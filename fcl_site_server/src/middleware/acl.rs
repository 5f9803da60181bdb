//! Access control middleware.
//!
//! This middleware can be placed on any route or service. It validates the bearer token on the incoming request
//! and then checks the claims in the token against the required roles for the route. If the token is valid and the
//! user has the required roles, the claims are stored in the request extensions (so handlers can extract them for
//! free) and the request continues. A missing or invalid token yields a 401; valid credentials without the
//! required roles yield a 403.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    HttpMessage,
};
use fcl_commerce_engine::db_types::Role;
use futures::{
    future::{ok, Ready},
    Future,
};
use log::warn;

use crate::{
    auth::{bearer_token, TokenIssuer},
    errors::AuthError,
};

pub struct AclMiddlewareFactory {
    required_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(required_roles: &[Role]) -> Self {
        AclMiddlewareFactory { required_roles: required_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_roles: self.required_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_roles = self.required_roles.clone();
        Box::pin(async move {
            let issuer = req.app_data::<web::Data<TokenIssuer>>().ok_or_else(|| {
                warn!("🔐️ No token issuer found in app data. Cannot authorize request.");
                Error::from(AuthError::CredentialError("Token issuer is not configured".into()))
            })?;
            let token = bearer_token(req.request()).ok_or_else(|| Error::from(AuthError::MissingToken))?;
            let claims = issuer.validate_token(token).map_err(Error::from)?;
            if required_roles.iter().all(|role| claims.roles.contains(role)) {
                req.extensions_mut().insert(claims);
                service.call(req).await
            } else {
                Err(AuthError::InsufficientPermissions.into())
            }
        })
    }
}
