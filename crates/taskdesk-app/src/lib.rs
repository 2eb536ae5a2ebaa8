// Application layer: use cases over the domain and infrastructure crates
pub mod application;
// Presentation layer: the `taskdesk` command line
pub mod presentation;
