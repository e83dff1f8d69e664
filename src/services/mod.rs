pub mod coupon_evaluator;
pub mod coupon_service;

pub use coupon_evaluator::*;
pub use coupon_service::*;
