pub mod config;
pub mod core;
pub mod error;
pub mod keys;
pub mod middlewares;
pub mod result;
pub(crate) mod routes;
pub mod start_server;
pub mod token;

#[cfg(test)]
mod tests;
