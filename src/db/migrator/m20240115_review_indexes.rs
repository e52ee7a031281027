use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_review_votes_unique ON review_votes(review_id, user_id, kind)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_reviews_car_id ON reviews(car_id)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_cars_make_model ON cars(make, model)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_cars_make_model")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_reviews_car_id")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_review_votes_unique")
            .await?;

        Ok(())
    }
}
