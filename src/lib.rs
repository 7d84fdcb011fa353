pub mod app;
pub mod auth;
pub mod auth_form;
pub mod avatar;
pub mod cards;
pub mod config;
pub mod error;
pub mod extract;
pub mod state;
pub mod store;
pub mod validation;

#[cfg(test)]
mod api_tests;
