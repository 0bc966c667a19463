//! # products
//!
//! The binary is intentionally thin: argument parsing lives in [`products::cli`],
//! routing in [`products::server`], and everything behind the routes in the
//! `productsapp` library. This file only invokes `cli::run()` and handles
//! process termination.

#[tokio::main]
async fn main() {
    if let Err(e) = products::cli::run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
