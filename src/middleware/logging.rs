//! Request start/finish logging.
//!
//! Runs inside the root span opened by `tracing_actix_web::TracingLogger`, so
//! every line carries that request's id. Client and server errors are logged
//! at `warn`/`error` so failed analyses stand out from normal traffic.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    time::Instant,
};
use tracing::{error, info, warn};

pub struct RequestLogging;

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingMiddleware { service }))
    }
}

pub struct RequestLoggingMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        info!(method = %method, path = %path, "Request started");

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let duration_ms = start_time.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_server_error() {
                        error!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Request completed");
                    } else if status.is_client_error() {
                        warn!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Request completed");
                    } else {
                        info!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Request completed");
                    }
                }
                Err(err) => {
                    error!(method = %method, path = %path, duration_ms, error = %err, "Request failed");
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn test_passes_responses_through() {
        let app = test::init_service(
            App::new()
                .wrap(RequestLogging)
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("ok") }))
                .route("/teapot", web::get().to(|| async { HttpResponse::ImATeapot().finish() })),
        )
        .await;

        let response = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
        assert!(response.status().is_success());
        assert_eq!(test::read_body(response).await, web::Bytes::from_static(b"ok"));

        let response = test::call_service(&app, test::TestRequest::get().uri("/teapot").to_request()).await;
        assert_eq!(response.status().as_u16(), 418);
    }
}
