use tracing::info;

use crate::limits::*;
use crate::model::*;

use super::{BookingError, Hotel};

fn check_len(value: &str, max: usize, what: &'static str) -> Result<(), BookingError> {
    if value.len() > max {
        return Err(BookingError::LimitExceeded(what));
    }
    Ok(())
}

impl Hotel {
    // ── Customers ────────────────────────────────────────────

    pub fn register_customer(&self, new: NewCustomer) -> Result<Customer, BookingError> {
        check_len(&new.name, MAX_NAME_LEN, "customer name too long")?;
        check_len(&new.address, MAX_ADDRESS_LEN, "address too long")?;
        check_len(&new.phone, MAX_PHONE_LEN, "phone too long")?;

        let customer = Customer {
            code: self.customers.next_code()?,
            name: new.name,
            address: new.address,
            phone: new.phone,
        };
        self.customers.append(&customer)?;
        info!("customer {} registered", customer.code);
        Ok(customer)
    }

    pub fn customer_exists(&self, code: Code) -> Result<bool, BookingError> {
        Ok(self.lookup_customer(code)?.is_some())
    }

    pub fn lookup_customer(&self, code: Code) -> Result<Option<Customer>, BookingError> {
        Ok(self.customers.find_by_code(code)?)
    }

    /// Case-sensitive substring match on the name, every hit in store order.
    pub fn search_customers(&self, fragment: &str) -> Result<Vec<Customer>, BookingError> {
        let mut hits = Vec::new();
        for customer in self.customers.scan()? {
            let customer = customer?;
            if customer.name.contains(fragment) {
                hits.push(customer);
            }
        }
        Ok(hits)
    }

    // ── Staff ────────────────────────────────────────────────

    pub fn register_staff(&self, new: NewStaff) -> Result<Staff, BookingError> {
        check_len(&new.name, MAX_NAME_LEN, "staff name too long")?;
        check_len(&new.phone, MAX_PHONE_LEN, "phone too long")?;
        check_len(&new.role, MAX_ROLE_LEN, "role too long")?;
        if !new.salary.is_finite() || new.salary < 0.0 {
            return Err(BookingError::InvalidSalary);
        }

        let staff = Staff {
            code: self.staff.next_code()?,
            name: new.name,
            phone: new.phone,
            role: new.role,
            salary: new.salary,
        };
        self.staff.append(&staff)?;
        info!("staff member {} registered", staff.code);
        Ok(staff)
    }

    pub fn lookup_staff(&self, code: Code) -> Result<Option<Staff>, BookingError> {
        Ok(self.staff.find_by_code(code)?)
    }

    pub fn search_staff(&self, fragment: &str) -> Result<Vec<Staff>, BookingError> {
        let mut hits = Vec::new();
        for member in self.staff.scan()? {
            let member = member?;
            if member.name.contains(fragment) {
                hits.push(member);
            }
        }
        Ok(hits)
    }

    // ── Rooms ────────────────────────────────────────────────

    /// Room numbers are chosen by the operator and must be unique. New rooms
    /// start unoccupied.
    pub fn register_room(
        &self,
        number: Code,
        capacity: u32,
        daily_rate: f64,
    ) -> Result<Room, BookingError> {
        if capacity == 0 {
            return Err(BookingError::InvalidRoom("capacity must be at least 1"));
        }
        if !daily_rate.is_finite() || daily_rate < 0.0 {
            return Err(BookingError::InvalidRoom("daily rate must be a non-negative amount"));
        }
        if self.lookup_room(number)?.is_some() {
            return Err(BookingError::RoomExists(number));
        }

        let room = Room {
            number,
            capacity,
            daily_rate,
            occupied: false,
        };
        self.rooms.append(&room)?;
        info!("room {number} registered: {capacity} guests at {daily_rate:.2}/day");
        Ok(room)
    }
}
