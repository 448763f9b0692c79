pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod models;
pub mod openlibrary;
pub mod server;
pub mod services;
