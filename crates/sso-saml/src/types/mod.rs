//! SAML 2.0 object model.
//!
//! Types produced by unmarshalling inbound messages.

mod assertion;
mod constants;
mod logout;
mod message;
mod name_id;
mod response;
mod status;

pub use assertion::*;
pub use constants::*;
pub use logout::*;
pub use message::*;
pub use name_id::*;
pub use response::*;
pub use status::*;
