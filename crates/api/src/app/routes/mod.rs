use axum::Router;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cron;
pub mod drops;
pub mod orders;
pub mod system;

/// Router for the public (session-scoped) storefront endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(catalog::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/drops", drops::router())
}
