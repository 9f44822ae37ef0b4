//! Inbound adapters driving the domain ports.

pub mod http;
