//! Request-independent application services.

pub mod rates;

pub use rates::attempt_fetch;
