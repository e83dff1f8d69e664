pub mod common;
pub mod coupon;
pub mod coupon_admin;
pub mod coupon_quote;
pub mod pagination;

pub use common::*;
pub use coupon::*;
pub use coupon_admin::*;
pub use coupon_quote::*;
pub use pagination::*;
