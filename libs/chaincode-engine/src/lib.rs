//! Image record contract: operation dispatch and the record handlers
//! that run against a `StateAccessor`.

pub mod dispatch;
pub mod error;
pub mod handlers;

pub use dispatch::Dispatcher;
pub use error::ContractError;
pub use handlers::{Handler, HandlerFuture, seed_images};
