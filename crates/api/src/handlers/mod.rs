pub mod admin;
pub mod cryptocurrencies;
pub mod health;
pub mod login;
pub mod market_data;
pub mod profile;
pub mod register;
pub mod transactions;
pub mod ws;
