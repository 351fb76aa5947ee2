use std::time::{Duration, Instant};

use innkeep::date::DateKey;
use innkeep::engine::{BookingError, Hotel};
use innkeep::model::NewCustomer;

const ROOMS: u32 = 50;
const CUSTOMERS: u32 = 20;
const ROUNDS: u32 = 300;

/// Per-operation latency samples, reported in microseconds.
#[derive(Default)]
struct Latencies {
    samples: Vec<Duration>,
}

impl Latencies {
    fn record(&mut self, since: Instant) {
        self.samples.push(since.elapsed());
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    /// Nearest-rank quantile over sorted samples, `q` in 0..=1.
    fn quantile_us(sorted: &[Duration], q: f64) -> f64 {
        let rank = ((sorted.len() - 1) as f64 * q).round() as usize;
        sorted[rank].as_secs_f64() * 1e6
    }

    fn report(mut self, op: &str) {
        if self.samples.is_empty() {
            println!("  {op:<11} no samples");
            return;
        }
        self.samples.sort_unstable();
        let sorted = &self.samples;
        let mean = sorted.iter().sum::<Duration>() / sorted.len() as u32;
        println!(
            "  {op:<11} n={:<4} mean={:>8.1}us p50={:>8.1}us p95={:>8.1}us p99={:>8.1}us worst={:>8.1}us",
            sorted.len(),
            mean.as_secs_f64() * 1e6,
            Self::quantile_us(sorted, 0.50),
            Self::quantile_us(sorted, 0.95),
            Self::quantile_us(sorted, 0.99),
            Self::quantile_us(sorted, 1.0),
        );
    }
}

fn setup(hotel: &Hotel) {
    let capacities = [1, 1, 2, 2, 2, 3, 4, 4, 6, 8];
    for n in 0..ROOMS {
        let capacity = capacities[n as usize % capacities.len()];
        hotel
            .register_room(100 + n, capacity, 80.0 + capacity as f64 * 20.0)
            .unwrap();
    }
    for n in 0..CUSTOMERS {
        hotel
            .register_customer(NewCustomer {
                name: format!("Guest {n}"),
                ..Default::default()
            })
            .unwrap();
    }
    println!("  created {ROOMS} rooms and {CUSTOMERS} customers");
}

/// Day `n` of a 12 x 28 day grid starting 2025-01-01.
fn day(n: u32) -> DateKey {
    let n = n % (12 * 28);
    DateKey::parse((n % 28 + 1) as i32, (n / 28 + 1) as i32, 2025).unwrap()
}

fn main() {
    let dir = std::env::temp_dir().join("innkeep_bench");
    let _ = std::fs::remove_dir_all(&dir);
    let hotel = Hotel::open(&dir).unwrap();

    println!("innkeep stress");
    setup(&hotel);

    let mut open_latencies = Latencies::default();
    let mut close_latencies = Latencies::default();
    let mut rejected = 0u32;
    let mut open_codes = Vec::new();

    let start = Instant::now();
    for round in 0..ROUNDS {
        let customer = round % CUSTOMERS + 1;
        let guests = round % 5 + 1;
        let checkin = day(round / 3);
        let checkout = day(round / 3 + 2);
        if checkout <= checkin {
            continue;
        }

        let t = Instant::now();
        match hotel.open_stay(customer, guests, checkin, checkout) {
            Ok(stay) => {
                open_latencies.record(t);
                open_codes.push(stay.code);
            }
            Err(BookingError::NoRoomAvailable { .. }) => rejected += 1,
            Err(e) => panic!("open_stay failed: {e}"),
        }

        // check out every other stay to keep rewrites in the mix
        if round % 2 == 1
            && let Some(code) = open_codes.pop()
        {
            let t = Instant::now();
            hotel.close_stay(code).unwrap();
            close_latencies.record(t);
        }
    }
    let elapsed = start.elapsed();

    println!(
        "  {} opened, {} closed, {rejected} rejected in {:.2}s",
        open_latencies.len(),
        close_latencies.len(),
        elapsed.as_secs_f64()
    );
    open_latencies.report("open_stay");
    close_latencies.report("close_stay");

    let _ = std::fs::remove_dir_all(&dir);
}
