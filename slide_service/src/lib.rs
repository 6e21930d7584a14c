pub mod adapters;
pub mod configuration;
pub mod controllers;
pub mod domain;
pub mod middlewares;
pub mod ports;
pub mod repositories;
pub mod routes;
pub mod startup;
