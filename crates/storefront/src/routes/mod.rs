//! HTTP route handlers for the storefront.
//!
//! The storefront is client-rendered, so every route serves JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check (in main.rs)
//!
//! # Catalog
//! GET  /products                    - Product listing
//! GET  /products/{id}               - Product detail
//! GET  /categories                  - Category listing
//! GET  /categories/{id}/products    - Products in a category
//! GET  /site-config                 - Site configuration singleton
//! GET  /files                       - Shared file listing
//! GET  /files/{id}/download         - Fresh download URL for a shared file
//!
//! # Wishlist
//! GET    /wishlist                  - Current entries
//! POST   /wishlist                  - Add a product by ID
//! DELETE /wishlist/{product_id}     - Remove an entry
//!
//! # Auth
//! POST  /auth/sign-in               - Credential sign-in
//! POST  /auth/sign-up               - Registration
//! POST  /auth/sign-out              - Sign-out (idempotent)
//! GET   /auth/session               - Current session state
//! PATCH /auth/profile               - Merge profile fields
//!
//! # AI flows
//! POST /ai/describe                 - Alternative product description
//! POST /ai/search                   - Natural-language catalog search
//!
//! # Account
//! GET  /users/by-phone/{phone}      - Guest lookup by phone number
//! POST /notifications/token         - Register a push token
//!
//! # Admin (administrator role required)
//! POST   /admin/products            - Create product
//! PUT    /admin/products/{id}       - Replace product
//! DELETE /admin/products/{id}       - Delete product
//! POST   /admin/categories          - Create category
//! PUT    /admin/categories/{id}     - Replace category
//! DELETE /admin/categories/{id}     - Delete category
//! PUT    /admin/site-config         - Replace site configuration
//! POST   /admin/files/{id}          - Upload a shared file
//! DELETE /admin/files/{id}          - Delete a shared file
//! ```

pub mod account;
pub mod admin;
pub mod ai;
pub mod auth;
pub mod categories;
pub mod files;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/categories/{id}/products", get(categories::products))
        .route("/site-config", get(categories::site_config))
        .route("/files", get(files::index))
        .route("/files/{id}/download", get(files::download))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::index).post(wishlist::add))
        .route("/wishlist/{product_id}", delete(wishlist::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/session", get(auth::session))
        .route("/auth/profile", patch(auth::update_profile))
}

/// Create the AI flow routes router.
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/describe", post(ai::describe))
        .route("/ai/search", post(ai::search))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users/by-phone/{phone}", get(account::by_phone))
        .route("/notifications/token", post(account::register_token))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products", post(admin::create_product))
        .route(
            "/admin/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/admin/categories", post(admin::create_category))
        .route(
            "/admin/categories/{id}",
            put(admin::update_category).delete(admin::delete_category),
        )
        .route("/admin/site-config", put(admin::update_site_config))
        .route(
            "/admin/files/{id}",
            post(files::upload).delete(files::delete),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(wishlist_routes())
        .merge(auth_routes())
        .merge(ai_routes())
        .merge(account_routes())
        .merge(admin_routes())
}
