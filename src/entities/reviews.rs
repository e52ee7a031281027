use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Plain reference to `cars.id`; deliberately not a foreign key.
    pub car_id: i32,

    pub title: String,

    pub body: String,

    pub rating: i32,

    /// Username of the author at submission time.
    pub author: String,

    /// RFC 3339 UTC timestamp with fixed precision so it sorts as text.
    pub date_posted: String,

    #[sea_orm(default_value = 0)]
    pub likes: i32,

    #[sea_orm(default_value = 0)]
    pub dislikes: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review_votes::Entity")]
    ReviewVotes,
}

impl Related<super::review_votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReviewVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
