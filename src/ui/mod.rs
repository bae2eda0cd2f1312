pub mod client_memory;
pub mod clients;
pub mod components;
pub mod dashboard;
pub mod finance;
pub mod landing;
pub mod layout;
pub mod login;
pub mod marketing;
pub mod route;
pub mod services;
pub mod settings;
pub mod templates;
