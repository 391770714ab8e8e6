//! Contract-facing API: the state accessor capability, the image record
//! and its wire format, and the invocation/response envelope.

pub mod error;
pub mod record;
pub mod response;
pub mod state;

pub use error::{ErrorKind, StateError};
pub use record::{
    image_key, ImageRecord, QueryResult, RecordEntry, IMAGE_DOC_TYPE, IMAGE_KEY_PREFIX,
    IMAGE_RANGE_END, IMAGE_RANGE_START,
};
pub use response::{Invocation, Response, STATUS_ERROR, STATUS_OK};
pub use state::{KeyValue, StateAccessor, StateFactory, StateIterator};
