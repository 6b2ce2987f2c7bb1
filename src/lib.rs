pub mod client;
pub mod excel;
pub mod json_export;
pub mod range;
