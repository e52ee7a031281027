//! `SeaORM` implementation of the `CatalogService` trait.

use crate::db::Store;
use crate::models::car::{Car, CarModelOption, NewCar};
use crate::services::catalog_service::{CatalogError, CatalogService};
use async_trait::async_trait;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_makes(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.list_makes().await?)
    }

    async fn list_models(&self, make: &str) -> Result<Vec<CarModelOption>, CatalogError> {
        Ok(self.store.list_models(make).await?)
    }

    async fn list_years(&self, make: &str, model: &str) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.list_years(make, model).await?)
    }

    async fn get_car(&self, car_id: i32) -> Result<Car, CatalogError> {
        self.store
            .get_car(car_id)
            .await?
            .ok_or(CatalogError::NotFound(car_id))
    }

    async fn import_cars(&self, cars: Vec<NewCar>) -> Result<usize, CatalogError> {
        if let Some(pos) = cars
            .iter()
            .position(|c| c.make.trim().is_empty() || c.model.trim().is_empty())
        {
            return Err(CatalogError::Validation(format!(
                "Car #{} is missing a make or model",
                pos + 1
            )));
        }

        Ok(self.store.add_cars(&cars).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;

    fn car(make: &str, model: &str, year: &str) -> NewCar {
        NewCar {
            make: make.to_string(),
            model: model.to_string(),
            year: year.to_string(),
            base_model: None,
        }
    }

    #[tokio::test]
    async fn cascading_queries_follow_make_and_model() {
        let service = SeaOrmCatalogService::new(temp_store().await);
        service
            .import_cars(vec![
                car("Mazda", "3", "2018"),
                car("Mazda", "3", "2019"),
                car("Mazda", "3", "2019"),
                car("Mazda", "CX-5", "2020"),
            ])
            .await
            .unwrap();

        assert_eq!(service.list_makes().await.unwrap(), vec!["Mazda".to_string()]);

        let models = service.list_models("Mazda").await.unwrap();
        assert_eq!(models.len(), 4);

        let mut years = service.list_years("Mazda", "3").await.unwrap();
        years.sort();
        assert_eq!(years, vec!["2018".to_string(), "2019".to_string()]);

        let first = service.get_car(models[0].id).await.unwrap();
        assert_eq!(first.make, "Mazda");
    }

    #[tokio::test]
    async fn unknown_car_is_not_found() {
        let service = SeaOrmCatalogService::new(temp_store().await);
        assert!(matches!(
            service.get_car(77).await,
            Err(CatalogError::NotFound(77))
        ));
    }

    #[tokio::test]
    async fn import_rejects_blank_make() {
        let service = SeaOrmCatalogService::new(temp_store().await);
        let err = service
            .import_cars(vec![car("Kia", "Rio", "2015"), car(" ", "Rio", "2016")])
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Validation(msg) if msg.contains("#2")));
        assert!(service.list_makes().await.unwrap().is_empty());
    }
}
