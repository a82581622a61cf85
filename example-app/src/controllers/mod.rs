pub mod admin;
pub mod health_controller;
pub mod posts_controller;
