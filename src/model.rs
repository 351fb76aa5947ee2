use serde::{Deserialize, Serialize};

use crate::date::{DateKey, Period};
use crate::store::Record;

/// Numeric key shared by every record type.
pub type Code = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub code: Code,
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub code: Code,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub number: Code,
    /// Max guests.
    pub capacity: u32,
    pub daily_rate: f64,
    /// Best-effort mirror: set when a booking lands on a free room, cleared
    /// at checkout. Never recomputed from the stay store.
    pub occupied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub code: Code,
    pub checkin: DateKey,
    pub checkout: DateKey,
    pub billed_days: u32,
    pub customer: Code,
    pub room: Code,
    pub active: bool,
}

impl Stay {
    pub fn period(&self) -> Period {
        Period {
            checkin: self.checkin,
            checkout: self.checkout,
            billed_days: self.billed_days,
        }
    }
}

impl Record for Customer {
    fn code(&self) -> Code {
        self.code
    }
}

impl Record for Staff {
    fn code(&self) -> Code {
        self.code
    }
}

impl Record for Room {
    fn code(&self) -> Code {
        self.number
    }
}

impl Record for Stay {
    fn code(&self) -> Code {
        self.code
    }
}

// ── Inputs ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewStaff {
    pub name: String,
    pub phone: String,
    pub role: String,
    pub salary: f64,
}

// ── Results ──────────────────────────────────────────────────────

/// Settlement for a closed stay.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub stay: Code,
    pub room: Code,
    pub billed_days: u32,
    pub daily_rate: f64,
    pub total: f64,
    /// False when the stay closed but the room's occupancy flag could not be
    /// cleared.
    pub room_released: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoyaltySummary {
    pub customer: Code,
    pub total_days: u32,
    pub points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keys() {
        let room = Room {
            number: 101,
            capacity: 2,
            daily_rate: 100.0,
            occupied: false,
        };
        assert_eq!(room.code(), 101);

        let stay = Stay {
            code: 7,
            checkin: DateKey::parse(1, 6, 2024).unwrap(),
            checkout: DateKey::parse(3, 6, 2024).unwrap(),
            billed_days: 2,
            customer: 1,
            room: 101,
            active: true,
        };
        assert_eq!(stay.code(), 7);
        assert_eq!(stay.period().billed_days, 2);
    }

    #[test]
    fn stay_serialization_roundtrip() {
        let stay = Stay {
            code: 3,
            checkin: DateKey::parse(30, 12, 2024).unwrap(),
            checkout: DateKey::parse(2, 1, 2025).unwrap(),
            billed_days: 3,
            customer: 9,
            room: 204,
            active: false,
        };
        let bytes = bincode::serialize(&stay).unwrap();
        let decoded: Stay = bincode::deserialize(&bytes).unwrap();
        assert_eq!(stay, decoded);
    }
}
