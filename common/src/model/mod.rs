pub mod client;
pub mod codes;
pub mod import;
pub mod nested;
pub mod vendor;
