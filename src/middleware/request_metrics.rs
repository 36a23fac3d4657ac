use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::api::metrics;

/// Feeds the `/metrics` counters: one tick per request, plus the status class
/// of every response.
pub struct RequestMetrics;

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestMetricsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsMiddleware { service }))
    }
}

pub struct RequestMetricsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
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
        metrics::increment_request_count();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    metrics::record_status(res.status().as_u16());
                    Ok(res)
                }
                Err(e) => {
                    metrics::record_status(e.as_response_error().status_code().as_u16());
                    Err(e)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    #[actix_web::test]
    async fn counts_requests_and_errors() {
        let app = test::init_service(
            App::new()
                .wrap(RequestMetrics)
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/bad", web::get().to(|| async { HttpResponse::BadRequest().finish() })),
        )
        .await;

        let before = metrics::snapshot();
        test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
        test::call_service(&app, test::TestRequest::get().uri("/bad").to_request()).await;
        let after = metrics::snapshot();

        assert!(after.http_requests_total >= before.http_requests_total + 2);
        assert!(after.http_client_errors_total > before.http_client_errors_total);
    }
}
