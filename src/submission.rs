pub mod codec;
pub mod driver;
pub mod endpoint;
pub mod protocol;
