pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, UserSession, require_admin, require_login};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod review_service;
pub mod review_service_impl;
pub use review_service::{ReviewError, ReviewService, ReviewSubmission};
pub use review_service_impl::SeaOrmReviewService;
