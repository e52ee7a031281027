pub use super::cars::Entity as Cars;
pub use super::review_votes::Entity as ReviewVotes;
pub use super::reviews::Entity as Reviews;
pub use super::users::Entity as Users;
