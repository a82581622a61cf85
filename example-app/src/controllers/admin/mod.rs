pub mod users_controller;
