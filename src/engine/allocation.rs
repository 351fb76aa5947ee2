use crate::date::Period;
use crate::model::*;

use super::{BookingError, Hotel};

impl Hotel {
    /// First-fit: the first room in store order that holds `required_capacity`
    /// guests and has no overlapping active stay. No attempt is made to
    /// minimize wasted capacity.
    pub fn find_available_room(
        &self,
        required_capacity: u32,
        period: &Period,
    ) -> Result<Option<Room>, BookingError> {
        for room in self.rooms.scan()? {
            let room = room?;
            if room.capacity >= required_capacity && self.is_period_free(room.number, period)? {
                return Ok(Some(room));
            }
        }
        Ok(None)
    }

    /// True unless an active stay on `room` overlaps `period`. Closed stays
    /// never block a booking.
    pub fn is_period_free(&self, room: Code, period: &Period) -> Result<bool, BookingError> {
        for stay in self.stays.scan()? {
            let stay = stay?;
            if stay.room == room && stay.active && period.overlaps(stay.checkin, stay.checkout) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn mark_occupied(&self, room: Code) -> Result<(), BookingError> {
        self.set_occupancy(room, true)
    }

    pub fn mark_free(&self, room: Code) -> Result<(), BookingError> {
        self.set_occupancy(room, false)
    }

    /// Setting a flag that is already set succeeds without touching the store.
    /// An unknown room number is `RoomNotFound`.
    fn set_occupancy(&self, number: Code, occupied: bool) -> Result<(), BookingError> {
        let mut room = self
            .lookup_room(number)?
            .ok_or(BookingError::RoomNotFound(number))?;
        if room.occupied == occupied {
            return Ok(());
        }
        room.occupied = occupied;
        if !self.rooms.find_and_replace(|r| r.number == number, room)? {
            return Err(BookingError::RoomNotFound(number));
        }
        Ok(())
    }
}
