//! HTTP Handlers

mod ping;
mod qr;

pub use ping::*;
pub use qr::*;
