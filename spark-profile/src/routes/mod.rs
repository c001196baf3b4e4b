pub mod health;
pub mod internal;
pub mod presence;
pub mod profile;
