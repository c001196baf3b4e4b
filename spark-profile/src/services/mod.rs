pub mod presence;
pub mod profile_service;
