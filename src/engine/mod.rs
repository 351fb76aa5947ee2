mod allocation;
mod directory;
mod error;
mod lifecycle;
mod queries;

pub use error::BookingError;

use std::io;
use std::path::{Path, PathBuf};

use crate::model::*;
use crate::store::RecordStore;

pub const CUSTOMERS_FILE: &str = "customers.dat";
pub const STAFF_FILE: &str = "staff.dat";
pub const ROOMS_FILE: &str = "rooms.dat";
pub const STAYS_FILE: &str = "stays.dat";

/// The hotel: one record store per entity type under a single data directory.
///
/// Every operation runs to completion against the files before returning.
/// There is no locking; a single process is assumed to own the directory.
#[derive(Debug, Clone)]
pub struct Hotel {
    data_dir: PathBuf,
    customers: RecordStore<Customer>,
    staff: RecordStore<Staff>,
    rooms: RecordStore<Room>,
    stays: RecordStore<Stay>,
}

impl Hotel {
    /// Bind to `data_dir`, creating it if missing. Store files are created on
    /// first write.
    pub fn open(data_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            customers: RecordStore::new(data_dir.join(CUSTOMERS_FILE)),
            staff: RecordStore::new(data_dir.join(STAFF_FILE)),
            rooms: RecordStore::new(data_dir.join(ROOMS_FILE)),
            stays: RecordStore::new(data_dir.join(STAYS_FILE)),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn lookup_room(&self, number: Code) -> Result<Option<Room>, BookingError> {
        Ok(self.rooms.find(|r| r.number == number)?)
    }

    pub fn lookup_stay(&self, code: Code) -> Result<Option<Stay>, BookingError> {
        Ok(self.stays.find(|s| s.code == code)?)
    }
}
