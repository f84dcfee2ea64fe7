// Library root
// -----------
// This crate exposes the publisher client and the console flow built on
// top of it. The binary (`main.rs`) only configures logging, reads the
// environment and hands over to `ui::run`.
//
// Module responsibilities:
// - `api`: GraphQL requests to Hashnode (current user, publications,
//   create story) and their typed responses.
// - `error`: the error values every `api` operation returns.
// - `articles`: the built-in article library.
// - `ui`: banner, article selection and publish reporting.
pub mod api;
pub mod articles;
pub mod error;
pub mod ui;
