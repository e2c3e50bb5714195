pub mod estimate;
pub mod geocode;
pub mod health;
pub mod sessions;
pub mod tariffs;
