pub mod prelude;

pub mod cars;
pub mod review_votes;
pub mod reviews;
pub mod users;
