pub mod status;

pub use status::{DefectStatus, ParseStatusError};
