mod client;

pub use client::PortfolioRestClient;
