use mot_core::ObjectId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("passenger {0} is already boarded on a carrier")]
    AlreadyBoarded(ObjectId),

    #[error("local offset ({x}, {y}, {z}) exceeds the carrier bounds")]
    OutOfBounds { x: f32, y: f32, z: f32 },

    #[error("no live carrier with guid {0}")]
    NoSuchCarrier(ObjectId),
}
