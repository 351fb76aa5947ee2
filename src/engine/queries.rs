use std::collections::HashSet;

use crate::limits::POINTS_PER_DAY;
use crate::model::*;

use super::{BookingError, Hotel};

impl Hotel {
    pub fn list_customers(&self) -> Result<Vec<Customer>, BookingError> {
        Ok(self.customers.load_all()?)
    }

    pub fn list_staff(&self) -> Result<Vec<Staff>, BookingError> {
        Ok(self.staff.load_all()?)
    }

    pub fn list_rooms(&self) -> Result<Vec<Room>, BookingError> {
        Ok(self.rooms.load_all()?)
    }

    pub fn list_stays(&self) -> Result<Vec<Stay>, BookingError> {
        Ok(self.stays.load_all()?)
    }

    pub fn stays_for_customer(&self, customer: Code) -> Result<Vec<Stay>, BookingError> {
        self.stays_matching(|s| s.customer == customer)
    }

    /// Stays whose customer's name contains `fragment` (case-sensitive).
    pub fn stays_for_customer_name(&self, fragment: &str) -> Result<Vec<Stay>, BookingError> {
        let codes: HashSet<Code> = self
            .search_customers(fragment)?
            .into_iter()
            .map(|c| c.code)
            .collect();
        self.stays_matching(|s| codes.contains(&s.customer))
    }

    /// Points accrue on every stay, open or closed.
    pub fn loyalty_points(&self, customer: Code) -> Result<LoyaltySummary, BookingError> {
        let total_days = self
            .stays_for_customer(customer)?
            .iter()
            .fold(0u32, |days, s| days.saturating_add(s.billed_days));
        Ok(LoyaltySummary {
            customer,
            total_days,
            points: total_days.saturating_mul(POINTS_PER_DAY),
        })
    }

    fn stays_matching(&self, mut pred: impl FnMut(&Stay) -> bool) -> Result<Vec<Stay>, BookingError> {
        let mut hits = Vec::new();
        for stay in self.stays.scan()? {
            let stay = stay?;
            if pred(&stay) {
                hits.push(stay);
            }
        }
        Ok(hits)
    }
}
