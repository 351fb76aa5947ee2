use tracing::{info, warn};

use crate::date::{DateKey, Period};
use crate::model::*;
use crate::observability;

use super::{BookingError, Hotel};

impl Hotel {
    /// Book a room for `guests` guests of `customer` over `[checkin, checkout)`.
    ///
    /// The stay is persisted before the room's occupancy flag is touched. If
    /// that flag update fails the stay still stands and only a warning is
    /// logged.
    pub fn open_stay(
        &self,
        customer: Code,
        guests: u32,
        checkin: DateKey,
        checkout: DateKey,
    ) -> Result<Stay, BookingError> {
        self.try_open_stay(customer, guests, checkin, checkout)
            .inspect_err(|e| {
                metrics::counter!(
                    observability::BOOKINGS_REJECTED_TOTAL,
                    "reason" => observability::rejection_label(e)
                )
                .increment(1);
            })
    }

    fn try_open_stay(
        &self,
        customer: Code,
        guests: u32,
        checkin: DateKey,
        checkout: DateKey,
    ) -> Result<Stay, BookingError> {
        if guests == 0 {
            return Err(BookingError::InvalidGuestCount);
        }
        if !self.customer_exists(customer)? {
            return Err(BookingError::CustomerNotFound(customer));
        }
        let period = Period::new(checkin, checkout)?;

        let room = self
            .find_available_room(guests, &period)?
            .ok_or(BookingError::NoRoomAvailable { guests })?;

        let stay = Stay {
            code: self.stays.next_code()?,
            checkin: period.checkin,
            checkout: period.checkout,
            billed_days: period.billed_days,
            customer,
            room: room.number,
            active: true,
        };
        self.stays.append(&stay)?;
        metrics::counter!(observability::STAYS_OPENED_TOTAL).increment(1);
        info!(
            "stay {} opened: customer {} in room {} from {} to {} ({} days)",
            stay.code, customer, room.number, stay.checkin, stay.checkout, stay.billed_days
        );

        if !room.occupied
            && let Err(e) = self.mark_occupied(room.number)
        {
            metrics::counter!(observability::OCCUPANCY_UPDATE_FAILURES_TOTAL).increment(1);
            warn!("stay {}: could not mark room {} occupied: {e}", stay.code, room.number);
        }

        Ok(stay)
    }

    /// Check a stay out: bill `billed_days * daily_rate`, close the stay and
    /// free its room.
    ///
    /// A failure to free the room does not reopen the stay; it is reported
    /// through [`Receipt::room_released`].
    pub fn close_stay(&self, code: Code) -> Result<Receipt, BookingError> {
        let mut stay = self
            .lookup_stay(code)?
            .ok_or(BookingError::StayNotFound(code))?;
        if !stay.active {
            return Err(BookingError::AlreadyClosed(code));
        }
        let room = self
            .lookup_room(stay.room)?
            .ok_or(BookingError::Consistency {
                stay: code,
                room: stay.room,
            })?;

        let total = f64::from(stay.billed_days) * room.daily_rate;

        stay.active = false;
        match self.stays.find_and_replace(|s| s.code == code, stay.clone()) {
            Ok(true) => {}
            Ok(false) => {
                return Err(BookingError::Persistence {
                    stay: code,
                    reason: "record vanished during rewrite".into(),
                });
            }
            Err(e) => {
                return Err(BookingError::Persistence {
                    stay: code,
                    reason: e.to_string(),
                });
            }
        }
        metrics::counter!(observability::STAYS_CLOSED_TOTAL).increment(1);

        let room_released = match self.mark_free(room.number) {
            Ok(()) => true,
            Err(e) => {
                metrics::counter!(observability::OCCUPANCY_UPDATE_FAILURES_TOTAL).increment(1);
                warn!("stay {code}: closed but room {} not released: {e}", room.number);
                false
            }
        };

        info!(
            "stay {code} closed: {} days x {:.2} = {total:.2}",
            stay.billed_days, room.daily_rate
        );

        Ok(Receipt {
            stay: code,
            room: room.number,
            billed_days: stay.billed_days,
            daily_rate: room.daily_rate,
            total,
            room_released,
        })
    }
}
