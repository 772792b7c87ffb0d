//! `reqwest`-backed [`Transport`](twin_seed_core::transport::Transport) with
//! retry on connection failures.

mod client;
mod retry;

pub use client::HttpTransport;
pub use retry::RetryPolicy;
