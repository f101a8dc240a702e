// 🧪 Fabricated Attributes - plausible fake addresses, phones, companies
//
// Canonical family data only carries names, tax ids and locations. Everything
// else a payor record needs (street, ZIP, phone, NPI) is made up here from
// small vocabularies, drawing from the run's shared random stream.

use crate::context::pick;
use crate::states::{self, STATES};
use rand::Rng;

// ============================================================================
// VOCABULARIES
// ============================================================================

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda",
    "David", "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica",
    "Thomas", "Sarah", "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas",
    "Taylor", "Moore", "Jackson", "Martin", "Lee", "Thompson", "White", "Harris",
    "Clark", "Lewis", "Walker", "Hall", "Young", "King", "Wright",
];

const STREET_NAMES: &[&str] = &[
    "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Washington", "Lake", "Hill",
    "Park", "Sunset", "Lincoln", "Jefferson", "Madison", "Franklin", "Highland",
    "Ridge", "Spring", "Meadow", "River",
];

/// Long-form suffixes first so the address mess has something to abbreviate
const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Boulevard", "Drive", "Road", "Street", "Avenue", "Drive",
    "Lane", "Court", "Way", "Parkway", "Place", "Circle",
];

const CITY_PREFIXES: &[&str] = &["North", "South", "East", "West", "New", "Lake", "Port", "Fort"];

const CITY_SUFFIXES: &[&str] = &[
    "ville", "town", "burgh", "port", "field", "land", "haven", "view", "side", "mouth",
];

const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "Ltd", "PLC", "and Sons"];

// ============================================================================
// FABRICATORS
// ============================================================================

/// e.g. "4821 Maple Avenue" or "77 Ridge Drive Suite 210"
pub fn street_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number = rng.gen_range(10..=99999);
    let name = pick(rng, STREET_NAMES);
    let suffix = pick(rng, STREET_SUFFIXES);
    let mut address = format!("{} {} {}", number, name, suffix);
    if rng.gen::<f64>() < 0.15 {
        address.push_str(&format!(" Suite {}", rng.gen_range(100..=999)));
    }
    address
}

pub fn city<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.gen_range(0..4) {
        0 => format!("{} {}", pick(rng, CITY_PREFIXES), pick(rng, FIRST_NAMES)),
        1 => format!("{}{}", pick(rng, FIRST_NAMES), pick(rng, CITY_SUFFIXES)),
        2 => format!("{}{}", pick(rng, LAST_NAMES), pick(rng, CITY_SUFFIXES)),
        _ => format!(
            "{} {}{}",
            pick(rng, CITY_PREFIXES),
            pick(rng, LAST_NAMES),
            pick(rng, CITY_SUFFIXES)
        ),
    }
}

/// Any 5-digit ZIP, not tied to a state
pub fn zipcode<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:05}", rng.gen_range(501..=99950))
}

/// ZIP inside the state's range; None when the code is not a known state
pub fn zipcode_in_state<R: Rng + ?Sized>(rng: &mut R, state_code: &str) -> Option<String> {
    let state = states::lookup(state_code)?;
    Some(format!("{:05}", rng.gen_range(state.zip_min..=state.zip_max)))
}

/// Phone in one of several common US layouts
pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let area = rng.gen_range(201..=989);
    let exchange = rng.gen_range(200..=999);
    let line = rng.gen_range(0..=9999);
    match rng.gen_range(0..5) {
        0 => format!("{}-{}-{:04}", area, exchange, line),
        1 => format!("({}){}-{:04}", area, exchange, line),
        2 => format!("{}.{}.{:04}", area, exchange, line),
        3 => format!("+1-{}-{}-{:04}", area, exchange, line),
        _ => format!("001-{}-{}-{:04}", area, exchange, line),
    }
}

/// e.g. "Walker LLC", "Harris-Young", "Clark, Lee and King"
pub fn company<R: Rng + ?Sized>(rng: &mut R) -> String {
    match rng.gen_range(0..3) {
        0 => format!("{} {}", pick(rng, LAST_NAMES), pick(rng, COMPANY_SUFFIXES)),
        1 => format!("{}-{}", pick(rng, LAST_NAMES), pick(rng, LAST_NAMES)),
        _ => format!(
            "{}, {} and {}",
            pick(rng, LAST_NAMES),
            pick(rng, LAST_NAMES),
            pick(rng, LAST_NAMES)
        ),
    }
}

pub fn state_abbr<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    pick(rng, STATES).code
}

/// 10-digit NPI starting with 1
pub fn npi<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("1{}", rng.gen_range(100_000_000..=999_999_999u32))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zipcode_in_state_within_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let zip = zipcode_in_state(&mut rng, "TX").unwrap();
            let n: u32 = zip.parse().unwrap();
            assert!((75503..=79999).contains(&n));
            assert_eq!(zip.len(), 5);
        }
    }

    #[test]
    fn test_zipcode_in_state_pads_leading_zero() {
        let mut rng = StdRng::seed_from_u64(3);
        let zip = zipcode_in_state(&mut rng, "MA").unwrap();
        assert_eq!(zip.len(), 5);
        assert!(zip.starts_with('0'));
    }

    #[test]
    fn test_zipcode_in_unknown_state() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(zipcode_in_state(&mut rng, "XX").is_none());
    }

    #[test]
    fn test_phone_has_ten_digits() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let phone = phone_number(&mut rng);
            let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
            assert!(digits.len() >= 10, "{}", phone);
        }
    }

    #[test]
    fn test_npi_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let npi = npi(&mut rng);
        assert_eq!(npi.len(), 10);
        assert!(npi.starts_with('1'));
    }

    #[test]
    fn test_street_address_starts_with_number() {
        let mut rng = StdRng::seed_from_u64(5);
        let address = street_address(&mut rng);
        assert!(address.chars().next().unwrap().is_ascii_digit());
    }
}
