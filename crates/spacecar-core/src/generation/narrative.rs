//! World-building fields attached to every generated row.

use rand::seq::SliceRandom;
use rand::Rng;

use spacecar_logic::catalog::{
    ADMINISTRATORS, COLOR_NAMES, CREW_STATUS, MISSION_TYPE, NAVIGATION_MODE, STATIONS,
    TELEMETRY_MESSAGES,
};

/// Narrative columns of a feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct Narrative {
    pub test_id: String,
    pub test_date: String,
    pub assigned_by: String,
    pub mission_type: String,
    pub crew_status: String,
    pub navigation_mode: String,
    pub origin_station: String,
    pub destination_station: String,
    pub car_color: String,
    pub last_telemetry_message: String,
    pub ship_serial_number: String,
}

fn uppercase_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(rng.gen_range(b'A'..=b'Z'))
}

fn pick<R: Rng + ?Sized>(table: &[&str], rng: &mut R) -> String {
    table.choose(rng).copied().unwrap_or("Unknown").to_string()
}

/// Draw an origin and a different destination.
pub fn route<R: Rng + ?Sized>(rng: &mut R) -> (String, String) {
    let origin = pick(STATIONS, rng);
    let others: Vec<&str> = STATIONS.iter().copied().filter(|s| *s != origin).collect();
    let destination = pick(&others, rng);
    (origin, destination)
}

/// `CASE-<0..=9999>-<A-Z>`.
pub fn test_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number: u32 = rng.gen_range(0..=9999);
    format!("CASE-{number}-{}", uppercase_letter(rng))
}

/// `CXS-<1000..=9999>-<A-Z><A-Z>`.
pub fn ship_serial<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number: u32 = rng.gen_range(1000..=9999);
    let a = uppercase_letter(rng);
    let b = uppercase_letter(rng);
    format!("CXS-{number}-{a}{b}")
}

/// ISO date in the year 4025. Days stop at 28 so every month is valid.
pub fn test_date<R: Rng + ?Sized>(rng: &mut R) -> String {
    let month: u32 = rng.gen_range(1..=12);
    let day: u32 = rng.gen_range(1..=28);
    format!("4025-{month:02}-{day:02}")
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Narrative {
    let (origin_station, destination_station) = route(rng);
    Narrative {
        test_id: test_id(rng),
        test_date: test_date(rng),
        assigned_by: pick(ADMINISTRATORS, rng),
        mission_type: MISSION_TYPE.to_string(),
        crew_status: CREW_STATUS.to_string(),
        navigation_mode: NAVIGATION_MODE.to_string(),
        origin_station,
        destination_station,
        car_color: pick(COLOR_NAMES, rng),
        last_telemetry_message: pick(TELEMETRY_MESSAGES, rng),
        ship_serial_number: ship_serial(rng),
    }
}
