pub mod admin;
pub mod coupon;

pub use coupon::coupon_config;
