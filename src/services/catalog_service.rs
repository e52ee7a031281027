//! Domain service for the make/model/year catalog behind the car picker.

use crate::models::car::{Car, CarModelOption, NewCar};
use thiserror::Error;

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Car {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Distinct makes, in store order.
    async fn list_makes(&self) -> Result<Vec<String>, CatalogError>;

    /// Every car of a make, as model name plus car id.
    async fn list_models(&self, make: &str) -> Result<Vec<CarModelOption>, CatalogError>;

    /// Distinct years available for a make and model.
    async fn list_years(&self, make: &str, model: &str) -> Result<Vec<String>, CatalogError>;

    async fn get_car(&self, car_id: i32) -> Result<Car, CatalogError>;

    /// Loads reference data. Returns the number of cars inserted.
    async fn import_cars(&self, cars: Vec<NewCar>) -> Result<usize, CatalogError>;
}
