//! HTTP routing for the product endpoints.
//!
//! Handlers here only extract raw path segments and bodies and hand them to
//! [`ProductHandler`], which does binding, validation and status mapping. The
//! catalogue core is synchronous, so every call runs on tokio's blocking pool.

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use productsapp::config::ServiceConfig;
use productsapp::error::ProductsError;
use productsapp::handler::{ProductHandler, Response as Envelope};
use productsapp::model::Product;
use productsapp::repository::Repository;
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const TOKEN_HEADER: &str = "token";

type Shared<R> = Arc<ProductHandler<R>>;

pub fn router<R: Repository + 'static>(handler: Shared<R>) -> Router {
    let products = Router::new()
        .route("/products", get(list_products::<R>).post(store_product::<R>))
        .route(
            "/products/:id",
            put(update_product::<R>)
                .patch(update_name_and_price::<R>)
                .delete(delete_product::<R>),
        )
        .route("/products/:id/hard", delete(hard_delete_product::<R>))
        .route_layer(middleware::from_fn_with_state(
            handler.clone(),
            require_token::<R>,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(products)
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let handler = Arc::new(productsapp::open(&config)?);
    let app = router(handler);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", &addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn require_token<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(err) = handler.validate_token(provided) {
        warn!(path = %request.uri().path(), "rejected request with missing or wrong token");
        return respond(Envelope::<()>::from_error(&err)).into_response();
    }

    next.run(request).await
}

fn respond<T: Serialize>(envelope: Envelope<T>) -> (StatusCode, Json<Envelope<T>>) {
    let status =
        StatusCode::from_u16(envelope.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope))
}

async fn on_blocking_pool<R, T, F>(handler: Shared<R>, call: F) -> (StatusCode, Json<Envelope<T>>)
where
    R: Repository + 'static,
    T: Serialize + Send + 'static,
    F: FnOnce(&ProductHandler<R>) -> Envelope<T> + Send + 'static,
{
    let envelope = match tokio::task::spawn_blocking(move || call(handler.as_ref())).await {
        Ok(envelope) => envelope,
        Err(e) => Envelope::from_error(&ProductsError::Store(format!("request task failed: {}", e))),
    };
    respond(envelope)
}

async fn list_products<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
) -> (StatusCode, Json<Envelope<Vec<Product>>>) {
    on_blocking_pool(handler, |h| h.get_all()).await
}

async fn store_product<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
    body: Bytes,
) -> (StatusCode, Json<Envelope<Product>>) {
    on_blocking_pool(handler, move |h| h.store(&body)).await
}

async fn update_product<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
    Path(id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Envelope<Product>>) {
    on_blocking_pool(handler, move |h| h.update(&id, &body)).await
}

async fn update_name_and_price<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
    Path(id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Envelope<Product>>) {
    on_blocking_pool(handler, move |h| h.update_name_and_price(&id, &body)).await
}

async fn delete_product<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Envelope<Vec<Product>>>) {
    on_blocking_pool(handler, move |h| h.delete(&id)).await
}

async fn hard_delete_product<R: Repository + 'static>(
    State(handler): State<Shared<R>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Envelope<Vec<Product>>>) {
    on_blocking_pool(handler, move |h| h.hard_delete(&id)).await
}
