pub mod coupons;
pub mod orders;

pub use coupons as coupon_entity;
pub use coupons::{CouponType, IdList};
pub use orders as order_entity;
pub use orders::OrderStatus;
