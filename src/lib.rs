//! Fuelwise Log
//!
//! Registro de repostajes por vehículo con cálculo de consumo y coste
//! por distancia, servido por una API HTTP con Axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
