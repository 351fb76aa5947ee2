use std::io::{self, BufRead, Write};
use std::str::FromStr;

use metrics_exporter_prometheus::PrometheusHandle;
use thiserror::Error;

use crate::date::{DateError, DateKey};
use crate::engine::{BookingError, Hotel};
use crate::model::*;

const MENU: &str = "\
=== INNKEEP ===
1 - Register customer
2 - Register staff member
3 - Register room
4 - Open stay
5 - Close stay (checkout)
6 - Search customer
7 - Search staff member
8 - Stays of a customer
9 - Loyalty points
10 - List customers
11 - List rooms
12 - List stays
13 - Metrics
0 - Exit";

#[derive(Debug, Error)]
enum ShellError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("invalid date: {0}")]
    Date(#[from] DateError),
    #[error("invalid input: {0}")]
    Input(String),
    #[error("end of input")]
    Eof,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Numeric-menu REPL over a [`Hotel`]. Reads operator input line by line.
pub struct Shell<R, W> {
    hotel: Hotel,
    input: R,
    output: W,
    metrics: Option<PrometheusHandle>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(hotel: Hotel, input: R, output: W) -> Self {
        Self {
            hotel,
            input,
            output,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Run until the operator picks 0, types a non-numeric choice, or input
    /// ends. Engine errors are printed and the loop continues.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n{MENU}")?;
            let choice = match self.prompt("Choice: ") {
                Ok(line) => line,
                Err(ShellError::Io(e)) => return Err(e),
                Err(_) => break,
            };
            let Ok(choice) = choice.trim().parse::<u32>() else {
                writeln!(self.output, "Invalid input. Exiting.")?;
                return Ok(());
            };

            let outcome = match choice {
                0 => break,
                1 => self.register_customer(),
                2 => self.register_staff(),
                3 => self.register_room(),
                4 => self.open_stay(),
                5 => self.close_stay(),
                6 => self.search_customer(),
                7 => self.search_staff(),
                8 => self.customer_stays(),
                9 => self.loyalty_points(),
                10 => self.list_customers(),
                11 => self.list_rooms(),
                12 => self.list_stays(),
                13 => self.show_metrics(),
                _ => {
                    writeln!(self.output, "Invalid option.")?;
                    Ok(())
                }
            };

            match outcome {
                Ok(()) => {}
                Err(ShellError::Eof) => break,
                Err(ShellError::Io(e)) => return Err(e),
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }
        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────

    fn prompt(&mut self, label: &str) -> Result<String, ShellError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str) -> Result<T, ShellError> {
        let line = self.prompt(label)?;
        line.trim()
            .parse()
            .map_err(|_| ShellError::Input(format!("expected a number, got {:?}", line.trim())))
    }

    /// Reads `day month year` on one line.
    fn prompt_date(&mut self, label: &str) -> Result<DateKey, ShellError> {
        let line = self.prompt(&format!("{label} (day month year): "))?;
        let parts: Vec<i32> = line
            .split_whitespace()
            .map(str::parse::<i32>)
            .collect::<Result<_, _>>()
            .map_err(|_| ShellError::Input(format!("malformed date {:?}", line.trim())))?;
        let [day, month, year] = parts[..] else {
            return Err(ShellError::Input(format!("malformed date {:?}", line.trim())));
        };
        Ok(DateKey::parse(day, month, year)?)
    }

    /// `true` for search by code, `false` for search by name.
    fn prompt_by_code(&mut self, what: &str) -> Result<bool, ShellError> {
        match self.prompt_number::<u32>(&format!("Search {what} by (1) code or (2) name? "))? {
            1 => Ok(true),
            2 => Ok(false),
            n => Err(ShellError::Input(format!("unknown search mode {n}"))),
        }
    }

    // ── Commands ─────────────────────────────────────────────

    fn register_customer(&mut self) -> Result<(), ShellError> {
        let new = NewCustomer {
            name: self.prompt("Name: ")?,
            address: self.prompt("Address: ")?,
            phone: self.prompt("Phone: ")?,
        };
        let customer = self.hotel.register_customer(new)?;
        writeln!(self.output, "Customer registered with code {}.", customer.code)?;
        Ok(())
    }

    fn register_staff(&mut self) -> Result<(), ShellError> {
        let new = NewStaff {
            name: self.prompt("Name: ")?,
            phone: self.prompt("Phone: ")?,
            role: self.prompt("Role: ")?,
            salary: self.prompt_number("Salary: ")?,
        };
        let staff = self.hotel.register_staff(new)?;
        writeln!(self.output, "Staff member registered with code {}.", staff.code)?;
        Ok(())
    }

    fn register_room(&mut self) -> Result<(), ShellError> {
        let number = self.prompt_number("Room number: ")?;
        let capacity = self.prompt_number("Guest capacity: ")?;
        let daily_rate = self.prompt_number("Daily rate: ")?;
        let room = self.hotel.register_room(number, capacity, daily_rate)?;
        writeln!(self.output, "Room {} registered.", room.number)?;
        Ok(())
    }

    fn open_stay(&mut self) -> Result<(), ShellError> {
        let customer = self.prompt_number("Customer code: ")?;
        let guests = self.prompt_number("Number of guests: ")?;
        let checkin = self.prompt_date("Check-in date")?;
        let checkout = self.prompt_date("Check-out date")?;
        let stay = self.hotel.open_stay(customer, guests, checkin, checkout)?;
        writeln!(
            self.output,
            "Stay {} opened | Room {} | Days: {}",
            stay.code, stay.room, stay.billed_days
        )?;
        Ok(())
    }

    fn close_stay(&mut self) -> Result<(), ShellError> {
        let code = self.prompt_number("Stay code: ")?;
        let receipt = self.hotel.close_stay(code)?;
        writeln!(
            self.output,
            "Total due: {} days x {:.2} = {:.2}",
            receipt.billed_days, receipt.daily_rate, receipt.total
        )?;
        if receipt.room_released {
            writeln!(self.output, "Checkout recorded and room {} released.", receipt.room)?;
        } else {
            writeln!(
                self.output,
                "Checkout recorded, but room {} could not be released.",
                receipt.room
            )?;
        }
        Ok(())
    }

    fn search_customer(&mut self) -> Result<(), ShellError> {
        let customers = if self.prompt_by_code("customer")? {
            let code = self.prompt_number("Code: ")?;
            self.hotel.lookup_customer(code)?.into_iter().collect()
        } else {
            let fragment = self.prompt("Name (or part of it): ")?;
            self.hotel.search_customers(&fragment)?
        };
        if customers.is_empty() {
            writeln!(self.output, "Customer not found.")?;
        }
        for c in &customers {
            self.write_customer(c)?;
        }
        Ok(())
    }

    fn search_staff(&mut self) -> Result<(), ShellError> {
        let staff = if self.prompt_by_code("staff member")? {
            let code = self.prompt_number("Code: ")?;
            self.hotel.lookup_staff(code)?.into_iter().collect()
        } else {
            let fragment = self.prompt("Name (or part of it): ")?;
            self.hotel.search_staff(&fragment)?
        };
        if staff.is_empty() {
            writeln!(self.output, "Staff member not found.")?;
        }
        for s in &staff {
            writeln!(
                self.output,
                "Code: {}\nName: {}\nPhone: {}\nRole: {}\nSalary: {:.2}\n----",
                s.code, s.name, s.phone, s.role, s.salary
            )?;
        }
        Ok(())
    }

    fn customer_stays(&mut self) -> Result<(), ShellError> {
        let stays = if self.prompt_by_code("stays")? {
            let code = self.prompt_number("Customer code: ")?;
            self.hotel.stays_for_customer(code)?
        } else {
            let fragment = self.prompt("Name (or part of it): ")?;
            self.hotel.stays_for_customer_name(&fragment)?
        };
        if stays.is_empty() {
            writeln!(self.output, "No stays found for the customer.")?;
        }
        for s in &stays {
            self.write_stay(s)?;
        }
        Ok(())
    }

    fn loyalty_points(&mut self) -> Result<(), ShellError> {
        let code = self.prompt_number("Customer code: ")?;
        let summary = self.hotel.loyalty_points(code)?;
        writeln!(
            self.output,
            "Customer {}: {} days accumulated -> {} loyalty points",
            summary.customer, summary.total_days, summary.points
        )?;
        Ok(())
    }

    fn list_customers(&mut self) -> Result<(), ShellError> {
        let customers = self.hotel.list_customers()?;
        if customers.is_empty() {
            writeln!(self.output, "No customers registered.")?;
        }
        for c in &customers {
            self.write_customer(c)?;
        }
        Ok(())
    }

    fn list_rooms(&mut self) -> Result<(), ShellError> {
        let rooms = self.hotel.list_rooms()?;
        if rooms.is_empty() {
            writeln!(self.output, "No rooms registered.")?;
        }
        for r in &rooms {
            writeln!(
                self.output,
                "Room {} | Capacity: {} | Rate: {:.2} | Status: {}",
                r.number,
                r.capacity,
                r.daily_rate,
                if r.occupied { "occupied" } else { "free" }
            )?;
        }
        Ok(())
    }

    fn list_stays(&mut self) -> Result<(), ShellError> {
        let stays = self.hotel.list_stays()?;
        if stays.is_empty() {
            writeln!(self.output, "No stays registered.")?;
        }
        for s in &stays {
            self.write_stay(s)?;
        }
        Ok(())
    }

    fn show_metrics(&mut self) -> Result<(), ShellError> {
        match &self.metrics {
            Some(handle) => write!(self.output, "{}", handle.render())?,
            None => writeln!(self.output, "Metrics are disabled (set INNKEEP_METRICS=1).")?,
        }
        Ok(())
    }

    // ── Output ───────────────────────────────────────────────

    fn write_customer(&mut self, c: &Customer) -> io::Result<()> {
        writeln!(
            self.output,
            "Code: {}\nName: {}\nAddress: {}\nPhone: {}\n----",
            c.code, c.name, c.address, c.phone
        )
    }

    fn write_stay(&mut self, s: &Stay) -> io::Result<()> {
        writeln!(
            self.output,
            "Stay {} | Customer {} | Room {} | {} -> {} | Days: {} | {}",
            s.code,
            s.customer,
            s.room,
            s.checkin,
            s.checkout,
            s.billed_days,
            if s.active { "active" } else { "closed" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn test_data_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("innkeep_test_shell").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn run_script(name: &str, script: &str) -> (Hotel, String) {
        let hotel = Hotel::open(test_data_dir(name)).unwrap();
        let mut out = Vec::new();
        Shell::new(hotel.clone(), Cursor::new(script.to_string()), &mut out)
            .run()
            .unwrap();
        (hotel, String::from_utf8(out).unwrap())
    }

    #[test]
    fn booking_session() {
        let script = "\
3\n101\n2\n100\n\
1\nMaria Silva\nRua A, 1\n555-0101\n\
4\n1\n2\n1 6 2024\n3 6 2024\n\
4\n1\n2\n2 6 2024\n4 6 2024\n\
5\n1\n\
12\n\
0\n";
        let (hotel, out) = run_script("booking_session", script);
        assert!(out.contains("Room 101 registered."));
        assert!(out.contains("Customer registered with code 1."));
        assert!(out.contains("Stay 1 opened | Room 101 | Days: 2"));
        assert!(out.contains("Error: no room available for 2 guest(s)"));
        assert!(out.contains("Total due: 2 days x 100.00 = 200.00"));
        assert!(out.contains("Checkout recorded and room 101 released."));
        assert!(out.contains("Stay 1 | Customer 1 | Room 101 | 20240601 -> 20240603 | Days: 2 | closed"));
        assert!(out.ends_with("Goodbye.\n"));
        assert_eq!(hotel.list_stays().unwrap().len(), 1);
    }

    #[test]
    fn invalid_date_reported_and_loop_continues() {
        let script = "\
1\nAna\nRua B\n555\n\
3\n101\n2\n100\n\
4\n1\n2\n1 13 2024\n\
4\n1\n2\n5 6 2024\n5 6 2024\n\
11\n\
0\n";
        let (hotel, out) = run_script("invalid_date", script);
        assert!(out.contains("Error: invalid date: month 13 out of range"));
        assert!(out.contains("Error: invalid period"));
        assert!(out.contains("Room 101 | Capacity: 2 | Rate: 100.00 | Status: free"));
        assert!(hotel.list_stays().unwrap().is_empty());
    }

    #[test]
    fn malformed_date_line() {
        let script = "1\nAna\nRua B\n555\n3\n101\n2\n100\n4\n1\n2\n1 6\n0\n";
        let (_, out) = run_script("malformed_date", script);
        assert!(out.contains("Error: invalid input: malformed date"));
    }

    #[test]
    fn search_and_loyalty() {
        let script = "\
1\nJoao Souza\nRua C\n555\n\
1\nPedro Lima\nRua D\n556\n\
6\n2\nSouza\n\
6\n1\n9\n\
3\n7\n1\n50\n\
4\n2\n1\n1 6 2024\n4 6 2024\n\
8\n2\nLima\n\
9\n2\n\
0\n";
        let (_, out) = run_script("search_loyalty", script);
        assert!(out.contains("Name: Joao Souza"));
        assert!(!out.contains("Name: Pedro Lima"));
        assert!(out.contains("Customer not found."));
        assert!(out.contains("Stay 1 | Customer 2 | Room 7 | 20240601 -> 20240604 | Days: 3 | active"));
        assert!(out.contains("Customer 2: 3 days accumulated -> 30 loyalty points"));
    }

    #[test]
    fn staff_registration() {
        let script = "2\nCarla\n555-0200\nManager\n4200.50\n7\n1\n1\n0\n";
        let (hotel, out) = run_script("staff", script);
        assert!(out.contains("Staff member registered with code 1."));
        assert!(out.contains("Role: Manager\nSalary: 4200.50"));
        assert_eq!(hotel.list_staff().unwrap().len(), 1);
    }

    #[test]
    fn non_numeric_choice_exits() {
        let (_, out) = run_script("non_numeric", "abc\n");
        assert!(out.contains("Invalid input. Exiting."));
    }

    #[test]
    fn end_of_input_exits() {
        let (_, out) = run_script("eof", "1\nAna\n");
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn unknown_option_and_disabled_metrics() {
        let (_, out) = run_script("unknown_option", "42\n13\n0\n");
        assert!(out.contains("Invalid option."));
        assert!(out.contains("Metrics are disabled"));
    }
}
