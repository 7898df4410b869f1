pub mod auth;
pub mod defect;
pub mod health;
pub mod member;
pub mod notification;
