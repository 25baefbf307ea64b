//! Wire format shared by the pinbridge transports.
//!
//! [`PinCodec`] turns pin operations into JSON bodies and decodes read
//! responses into typed values. The message types in [`message`] mirror the
//! firmware's JSON exactly.

pub mod codec;
pub mod message;

pub use codec::PinCodec;
pub use message::{PinReading, PinWrite, ReadPinsRequest, ReadPinsResponse, WritePinsRequest};
