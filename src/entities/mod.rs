pub mod coordinate;
pub mod route_estimate;
pub mod session;
pub mod tariff;
