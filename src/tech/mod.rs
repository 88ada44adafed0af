//! Technology ownership and pricing.

pub mod portfolio;

pub use portfolio::TechPortfolio;
