use crate::entities::{cars, prelude::*};
use crate::models::car::{Car, CarModelOption, NewCar};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use tracing::info;

/// Repository for the car catalog
pub struct CarRepository {
    conn: DatabaseConnection,
}

impl CarRepository {
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: cars::Model) -> Car {
        Car {
            id: m.id,
            make: m.make,
            model: m.model,
            year: m.year,
            base_model: m.base_model,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Car>> {
        let row = Cars::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query car by ID")?;

        Ok(row.map(Self::map_model))
    }

    /// Distinct makes in whatever order the database yields them.
    pub async fn distinct_makes(&self) -> Result<Vec<String>> {
        Cars::find()
            .select_only()
            .column(cars::Column::Make)
            .distinct()
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to query distinct makes")
    }

    pub async fn models_for_make(&self, make: &str) -> Result<Vec<CarModelOption>> {
        let rows = Cars::find()
            .select_only()
            .column(cars::Column::Model)
            .column(cars::Column::Id)
            .filter(cars::Column::Make.eq(make))
            .into_tuple::<(String, i32)>()
            .all(&self.conn)
            .await
            .context("Failed to query models for make")?;

        Ok(rows
            .into_iter()
            .map(|(model, id)| CarModelOption { model, id })
            .collect())
    }

    pub async fn distinct_years(&self, make: &str, model: &str) -> Result<Vec<String>> {
        Cars::find()
            .select_only()
            .column(cars::Column::Year)
            .distinct()
            .filter(cars::Column::Make.eq(make))
            .filter(cars::Column::Model.eq(model))
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to query years for make and model")
    }

    pub async fn insert_many(&self, cars_in: &[NewCar]) -> Result<usize> {
        if cars_in.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;

        for car in cars_in {
            let active = cars::ActiveModel {
                make: Set(car.make.clone()),
                model: Set(car.model.clone()),
                year: Set(car.year.clone()),
                base_model: Set(car.base_model.clone()),
                ..Default::default()
            };
            Cars::insert(active).exec(&txn).await?;
        }

        txn.commit().await?;
        info!("Imported {} cars", cars_in.len());
        Ok(cars_in.len())
    }
}
