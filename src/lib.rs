pub mod app_state;
pub mod database;
pub mod models;
pub mod services;
pub mod web;
