mod auth;
mod contact;
mod initiatives;
mod orders;
mod products;
mod settings;
