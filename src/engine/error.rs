use std::io;

use thiserror::Error;

use crate::date::DateError;
use crate::model::Code;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("store unavailable: {0}")]
    Io(#[from] io::Error),
    #[error("invalid period: {0}")]
    InvalidPeriod(#[from] DateError),
    #[error("guest count must be at least 1")]
    InvalidGuestCount,
    #[error("customer not found: {0}")]
    CustomerNotFound(Code),
    #[error("stay not found: {0}")]
    StayNotFound(Code),
    #[error("no room available for {guests} guest(s) in the requested period")]
    NoRoomAvailable { guests: u32 },
    #[error("stay {0} is already closed")]
    AlreadyClosed(Code),
    #[error("consistency error: stay {stay} references missing room {room}")]
    Consistency { stay: Code, room: Code },
    #[error("failed to persist stay {stay}: {reason}")]
    Persistence { stay: Code, reason: String },
    #[error("room {0} already exists")]
    RoomExists(Code),
    #[error("room not found: {0}")]
    RoomNotFound(Code),
    #[error("invalid room: {0}")]
    InvalidRoom(&'static str),
    #[error("salary must be a non-negative amount")]
    InvalidSalary,
    #[error("limit exceeded: {0}")]
    LimitExceeded(&'static str),
}
