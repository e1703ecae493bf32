pub mod auth;
pub mod countries;
pub mod entities;
pub mod pages;
