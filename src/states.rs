// 🗺️ US States - code, full name and ZIP range
// Used by the claims state mess and by in-state postal code synthesis

// ============================================================================
// STATE TABLE
// ============================================================================

/// One row of the state table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsState {
    pub code: &'static str,
    pub name: &'static str,
    /// Inclusive ZIP range (as integers, rendered zero-padded to 5 digits)
    pub zip_min: u32,
    pub zip_max: u32,
}

const fn st(code: &'static str, name: &'static str, zip_min: u32, zip_max: u32) -> UsState {
    UsState {
        code,
        name,
        zip_min,
        zip_max,
    }
}

pub const STATES: &[UsState] = &[
    st("AL", "Alabama", 35004, 36925),
    st("AK", "Alaska", 99501, 99950),
    st("AZ", "Arizona", 85001, 86556),
    st("AR", "Arkansas", 71601, 72959),
    st("CA", "California", 90001, 96162),
    st("CO", "Colorado", 80001, 81658),
    st("CT", "Connecticut", 6001, 6389),
    st("DE", "Delaware", 19701, 19980),
    st("FL", "Florida", 32004, 34997),
    st("GA", "Georgia", 30001, 31999),
    st("HI", "Hawaii", 96701, 96898),
    st("ID", "Idaho", 83201, 83876),
    st("IL", "Illinois", 60001, 62999),
    st("IN", "Indiana", 46001, 47997),
    st("IA", "Iowa", 50001, 52809),
    st("KS", "Kansas", 66002, 67954),
    st("KY", "Kentucky", 40003, 42788),
    st("LA", "Louisiana", 70001, 71232),
    st("ME", "Maine", 3901, 4992),
    st("MD", "Maryland", 20812, 21930),
    st("MA", "Massachusetts", 1001, 2791),
    st("MI", "Michigan", 48001, 49971),
    st("MN", "Minnesota", 55001, 56763),
    st("MS", "Mississippi", 38601, 39776),
    st("MO", "Missouri", 63001, 65899),
    st("MT", "Montana", 59001, 59937),
    st("NE", "Nebraska", 68001, 68118),
    st("NV", "Nevada", 88901, 89883),
    st("NH", "New Hampshire", 3031, 3897),
    st("NJ", "New Jersey", 7001, 8989),
    st("NM", "New Mexico", 87001, 88441),
    st("NY", "New York", 10001, 14905),
    st("NC", "North Carolina", 27006, 28909),
    st("ND", "North Dakota", 58001, 58856),
    st("OH", "Ohio", 43001, 45999),
    st("OK", "Oklahoma", 73001, 73199),
    st("OR", "Oregon", 97001, 97920),
    st("PA", "Pennsylvania", 15001, 19640),
    st("RI", "Rhode Island", 2801, 2940),
    st("SC", "South Carolina", 29001, 29948),
    st("SD", "South Dakota", 57001, 57799),
    st("TN", "Tennessee", 37010, 38589),
    st("TX", "Texas", 75503, 79999),
    st("UT", "Utah", 84001, 84784),
    st("VT", "Vermont", 5001, 5495),
    st("VA", "Virginia", 22001, 24658),
    st("WA", "Washington", 98001, 99403),
    st("WV", "West Virginia", 24701, 26886),
    st("WI", "Wisconsin", 53001, 54990),
    st("WY", "Wyoming", 82001, 83128),
];

// ============================================================================
// LOOKUPS
// ============================================================================

/// Find a state by its two-letter code (case-sensitive, as stored in canonical data)
pub fn lookup(code: &str) -> Option<&'static UsState> {
    STATES.iter().find(|s| s.code == code)
}

/// Full state name, or the code itself when unknown
pub fn full_name(code: &str) -> &str {
    match lookup(code) {
        Some(state) => state.name,
        None => code,
    }
}
