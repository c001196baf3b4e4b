pub mod candidates;
pub mod health;
pub mod matches;
pub mod swipes;
