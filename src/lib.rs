//! MarketMemo: catálogo de produtos com persistência num slot chave-valor
//! e análises de estoque derivadas da coleção.

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;
