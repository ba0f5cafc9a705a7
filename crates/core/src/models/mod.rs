pub mod position;
pub mod price;
pub mod quote;
pub mod settings;
pub mod valuation;
