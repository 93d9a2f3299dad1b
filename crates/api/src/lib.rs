//! `notely-api` — HTTP surface of the notes service.

pub mod app;
