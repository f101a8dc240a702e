// 🧹➡️💩 Mess Injection - turn clean payor fields into realistic dirty ones
//
// Every function maps (clean value, source, random stream) to a dirty value.
// Null in means null out: no function here fails on a missing field.
// Rules are keyed on `SourceSystem`, so adding a source is a compile error
// until every rule decides what to do with it.

use crate::context::{chance, pick};
use crate::source::SourceSystem;
use crate::states;
use rand::Rng;

// ============================================================================
// VOCABULARIES
// ============================================================================

pub const LEGAL_SUFFIXES: &[&str] = &["Inc.", "Inc", "LLC", "Corp.", "Corporation", "Co.", "L.P.", "Ltd."];

pub const BCBS_VARIANTS: &[&str] = &[
    "Blue Cross Blue Shield",
    "BlueCross BlueShield",
    "BCBS",
    "Blue Cross / Blue Shield",
    "Blue Cross and Blue Shield",
];

/// Long-form street tokens and the abbreviations each may collapse to
pub const STREET_ABBREVS: &[(&str, &[&str])] = &[
    ("Street", &["St", "St.", "Str"]),
    ("Avenue", &["Ave", "Ave.", "Av"]),
    ("Boulevard", &["Blvd", "Blvd."]),
    ("Drive", &["Dr", "Dr."]),
    ("Road", &["Rd", "Rd."]),
    ("Suite", &["Ste", "Ste.", "STE", "#"]),
];

const CANONICAL_BCBS: &str = "BLUE CROSS BLUE SHIELD";

// ============================================================================
// NAME
// ============================================================================

/// Source-specific name distortion
///
/// - CRM: 30% legal suffix, half as ", SUFFIX" and half as " SUFFIX"
/// - Claims: UPPER; 40% punctuation stripped; 30% Blue Cross alias swap
/// - Credentialing: 20% " Health Inc." appended, else 15% "Health Care" spelling
/// - Reference: 15% "Inc." suffix dropped
pub fn name_variant<R: Rng + ?Sized>(name: &str, source: SourceSystem, rng: &mut R) -> String {
    match source {
        SourceSystem::Crm => {
            let r: f64 = rng.gen();
            if r < 0.3 {
                let suffix = pick(rng, LEGAL_SUFFIXES);
                if r < 0.15 {
                    format!("{}, {}", name, suffix)
                } else {
                    format!("{} {}", name, suffix)
                }
            } else {
                name.to_string()
            }
        }
        SourceSystem::Claims => {
            let mut n = name.to_uppercase();
            if chance(rng, 0.4) {
                n = n.replace(',', "").replace('.', "");
            }
            if chance(rng, 0.3) && n.contains("BLUE CROSS") {
                let alias = pick(rng, BCBS_VARIANTS).to_uppercase();
                n = n.replace(CANONICAL_BCBS, &alias);
            }
            n
        }
        SourceSystem::Credentialing => {
            let r: f64 = rng.gen();
            if r < 0.2 {
                format!("{} Health Inc.", name)
            } else if r < 0.35 {
                name.replace("Healthcare", "Health Care")
            } else {
                name.to_string()
            }
        }
        SourceSystem::Reference => {
            if chance(rng, 0.15) {
                strip_inc(name)
            } else {
                name.to_string()
            }
        }
    }
}

/// Drop ", Inc.", " Inc." and " Inc" (in that order)
fn strip_inc(name: &str) -> String {
    name.replace(", Inc.", "").replace(" Inc.", "").replace(" Inc", "")
}

// ============================================================================
// ADDRESS
// ============================================================================

/// Each long-form street token present gets a 50% chance of abbreviation
pub fn address_variant<R: Rng + ?Sized>(address: &str, rng: &mut R) -> String {
    let mut out = address.to_string();
    for &(full, abbrevs) in STREET_ABBREVS {
        if out.contains(full) && chance(rng, 0.5) {
            let abbrev = pick(rng, abbrevs);
            out = out.replace(full, abbrev);
        }
    }
    out
}

/// Claims composite: "line1, line2, city, state, zip" skipping missing parts
pub fn single_line_address(
    line1: &str,
    line2: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    zip: Option<&str>,
) -> String {
    [Some(line1), line2, city, state, zip]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// STATE / ZIP / PHONE
// ============================================================================

/// Claims only: 40% of the time write the state as full name, lower-case
/// full name, or lower-case code
pub fn state_variant<R: Rng + ?Sized>(state_code: &str, source: SourceSystem, rng: &mut R) -> String {
    if source == SourceSystem::Claims && chance(rng, 0.4) {
        let full = states::full_name(state_code);
        return match rng.gen_range(0..3) {
            0 => full.to_string(),
            1 => full.to_lowercase(),
            _ => state_code.to_lowercase(),
        };
    }
    state_code.to_string()
}

/// Claims/Reference: 30% ZIP+4. Claims only: an independent 15% drops one
/// leading zero from the base ZIP, so "2134-5678" can happen.
pub fn zip_variant<R: Rng + ?Sized>(zip: Option<&str>, source: SourceSystem, rng: &mut R) -> Option<String> {
    let zip = zip?;
    if zip.is_empty() {
        return Some(String::new());
    }

    let plus_four = if matches!(source, SourceSystem::Claims | SourceSystem::Reference) && chance(rng, 0.3) {
        Some(rng.gen_range(1000..=9999))
    } else {
        None
    };

    let base = if source == SourceSystem::Claims && chance(rng, 0.15) {
        strip_one_leading_zero(zip)
    } else {
        zip.to_string()
    };

    Some(match plus_four {
        Some(ext) => format!("{}-{}", base, ext),
        None => base,
    })
}

/// "02134" -> "2134"; never returns an empty string
fn strip_one_leading_zero(zip: &str) -> String {
    match zip.strip_prefix('0') {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => zip.to_string(),
    }
}

/// Re-render the last 10 digits in one of five layouts
pub fn phone_variant<R: Rng + ?Sized>(phone: Option<&str>, rng: &mut R) -> Option<String> {
    let phone = phone.filter(|p| !p.is_empty())?;
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return Some(phone.to_string());
    }

    let d = &digits[digits.len() - 10..];
    let (area, exchange, line) = (&d[..3], &d[3..6], &d[6..]);
    let formatted = match rng.gen_range(0..5) {
        0 => format!("{}-{}-{}", area, exchange, line),
        1 => format!("({}) {}-{}", area, exchange, line),
        2 => d.to_string(),
        3 => format!("{}.{}.{}", area, exchange, line),
        _ => format!("1-{}-{}-{}", area, exchange, line),
    };
    Some(formatted)
}

// ============================================================================
// MISSING FIELDS / TAX ID / STATUS
// ============================================================================

/// Null out a present value with probability `p`
pub fn maybe_null<T, R: Rng + ?Sized>(value: Option<T>, p: f64, rng: &mut R) -> Option<T> {
    if chance(rng, p) {
        None
    } else {
        value
    }
}

/// CRM: "NN-NNNNNNN". Claims: 10% adjacent-digit swap. Others: digits only.
///
/// Reference records do not go through here; they carry the clean tax id.
pub fn tax_id_variant<R: Rng + ?Sized>(tax_id: Option<&str>, source: SourceSystem, rng: &mut R) -> Option<String> {
    let tax_id = tax_id.filter(|t| !t.is_empty())?;
    let digits: String = tax_id.chars().filter(|c| c.is_ascii_digit()).collect();

    match source {
        SourceSystem::Crm => {
            if digits.len() >= 3 {
                Some(format!("{}-{}", &digits[..2], &digits[2..]))
            } else {
                Some(digits)
            }
        }
        SourceSystem::Claims => {
            if chance(rng, 0.1) && digits.len() >= 5 {
                Some(transpose_digits(&digits, rng))
            } else {
                Some(digits)
            }
        }
        SourceSystem::Credentialing | SourceSystem::Reference => Some(digits),
    }
}

/// Swap positions i and i+1 for a random interior i in [2, len-2]
fn transpose_digits<R: Rng + ?Sized>(digits: &str, rng: &mut R) -> String {
    let mut d: Vec<char> = digits.chars().collect();
    let i = rng.gen_range(2..=d.len() - 2);
    d.swap(i, i + 1);
    d.into_iter().collect()
}

/// Claims keeps reporting 15% of inactive payors as active
pub fn maybe_stale_status<R: Rng + ?Sized>(is_active: bool, source: SourceSystem, rng: &mut R) -> bool {
    if source == SourceSystem::Claims && !is_active && chance(rng, 0.15) {
        return true;
    }
    is_active
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn digits_of(s: &str) -> String {
        s.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    #[test]
    fn test_crm_suffix_rate_and_passthrough() {
        let mut rng = rng();
        let trials = 20_000;
        let mut suffixed = 0;
        for _ in 0..trials {
            let out = name_variant("Acme Health", SourceSystem::Crm, &mut rng);
            if out == "Acme Health" {
                continue;
            }
            suffixed += 1;
            let rest = out.strip_prefix("Acme Health").unwrap();
            let suffix = rest.trim_start_matches(',').trim_start();
            assert!(LEGAL_SUFFIXES.contains(&suffix), "unexpected suffix in {}", out);
        }
        let rate = suffixed as f64 / trials as f64;
        assert!((rate - 0.3).abs() < 0.02, "suffix rate {}", rate);
    }

    #[test]
    fn test_claims_name_is_upper() {
        let mut rng = rng();
        for _ in 0..50 {
            let out = name_variant("Acme Health, Inc.", SourceSystem::Claims, &mut rng);
            assert_eq!(out, out.to_uppercase());
            assert!(out.starts_with("ACME HEALTH"));
        }
    }

    #[test]
    fn test_claims_blue_cross_aliases() {
        let mut rng = rng();
        let aliases: Vec<String> = BCBS_VARIANTS.iter().map(|v| v.to_uppercase()).collect();
        let mut swapped = false;
        for _ in 0..200 {
            let out = name_variant("Blue Cross Blue Shield of Texas", SourceSystem::Claims, &mut rng);
            assert!(out.ends_with(" OF TEXAS"));
            let prefix = out.trim_end_matches(" OF TEXAS");
            assert!(aliases.iter().any(|a| a == prefix), "{}", out);
            if prefix != "BLUE CROSS BLUE SHIELD" {
                swapped = true;
            }
        }
        assert!(swapped);
    }

    #[test]
    fn test_credentialing_name_variants() {
        let mut rng = rng();
        for _ in 0..200 {
            let out = name_variant("Sunrise Healthcare", SourceSystem::Credentialing, &mut rng);
            assert!(
                out == "Sunrise Healthcare"
                    || out == "Sunrise Health Care"
                    || out == "Sunrise Healthcare Health Inc.",
                "{}",
                out
            );
        }
    }

    #[test]
    fn test_reference_strips_inc() {
        let mut rng = rng();
        let mut stripped = 0;
        for _ in 0..500 {
            let out = name_variant("Acme Health, Inc.", SourceSystem::Reference, &mut rng);
            if out == "Acme Health" {
                stripped += 1;
            } else {
                assert_eq!(out, "Acme Health, Inc.");
            }
        }
        assert!(stripped > 0);
    }

    #[test]
    fn test_address_abbreviations() {
        let mut rng = rng();
        let mut changed = false;
        for _ in 0..100 {
            let out = address_variant("100 Main Street Suite 200", &mut rng);
            assert!(out.starts_with("100 Main "));
            assert!(out.ends_with(" 200"));
            if out != "100 Main Street Suite 200" {
                changed = true;
            }
        }
        assert!(changed);
    }

    #[test]
    fn test_address_without_tokens_untouched() {
        let mut rng = rng();
        assert_eq!(address_variant("12 Elm Lane", &mut rng), "12 Elm Lane");
    }

    #[test]
    fn test_single_line_address_skips_missing() {
        assert_eq!(
            single_line_address("1 Oak Rd", None, Some("Dallas"), Some("TX"), Some("75201")),
            "1 Oak Rd, Dallas, TX, 75201"
        );
        assert_eq!(
            single_line_address("1 Oak Rd", Some("Ste 100"), None, Some("TX"), None),
            "1 Oak Rd, Ste 100, TX"
        );
    }

    #[test]
    fn test_state_variant_only_for_claims() {
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(state_variant("TX", SourceSystem::Crm, &mut rng), "TX");
            assert_eq!(state_variant("TX", SourceSystem::Reference, &mut rng), "TX");
        }
        let allowed = ["TX", "Texas", "texas", "tx"];
        for _ in 0..200 {
            let out = state_variant("TX", SourceSystem::Claims, &mut rng);
            assert!(allowed.contains(&out.as_str()), "{}", out);
        }
    }

    #[test]
    fn test_zip_null_passthrough() {
        let mut rng = rng();
        assert_eq!(zip_variant(None, SourceSystem::Claims, &mut rng), None);
    }

    #[test]
    fn test_zip_plus_four_shape() {
        let mut rng = rng();
        let mut extended = 0;
        for _ in 0..300 {
            let out = zip_variant(Some("75201"), SourceSystem::Reference, &mut rng).unwrap();
            if out != "75201" {
                extended += 1;
                let (base, ext) = out.split_once('-').unwrap();
                assert_eq!(base, "75201");
                assert_eq!(ext.len(), 4);
            }
        }
        assert!(extended > 0);
    }

    #[test]
    fn test_claims_zero_strip_is_independent_of_plus_four() {
        let mut rng = rng();
        let trials = 20_000;
        let mut stripped = 0;
        let mut stripped_plus_four = 0;
        let mut plus_four = 0;
        for _ in 0..trials {
            let out = zip_variant(Some("02134"), SourceSystem::Claims, &mut rng).unwrap();
            let (base, ext) = match out.split_once('-') {
                Some((base, ext)) => (base.to_string(), Some(ext.to_string())),
                None => (out.clone(), None),
            };
            assert!(base == "02134" || base == "2134", "{}", out);
            if base == "2134" {
                stripped += 1;
            }
            if let Some(ext) = ext {
                assert_eq!(ext.len(), 4);
                plus_four += 1;
                if base == "2134" {
                    stripped_plus_four += 1;
                }
            }
        }
        let strip_rate = stripped as f64 / trials as f64;
        let plus_rate = plus_four as f64 / trials as f64;
        assert!((strip_rate - 0.15).abs() < 0.015, "strip rate {}", strip_rate);
        assert!((plus_rate - 0.3).abs() < 0.02, "plus-four rate {}", plus_rate);
        // Expected ~4.5% of outputs are both
        assert!(stripped_plus_four > trials / 50, "both {}", stripped_plus_four);
    }

    #[test]
    fn test_credentialing_zip_untouched() {
        let mut rng = rng();
        for _ in 0..50 {
            assert_eq!(
                zip_variant(Some("02134"), SourceSystem::Credentialing, &mut rng).as_deref(),
                Some("02134")
            );
        }
    }

    #[test]
    fn test_strip_leading_zero_single_and_never_empty() {
        assert_eq!(strip_one_leading_zero("02134"), "2134");
        assert_eq!(strip_one_leading_zero("00501"), "0501");
        assert_eq!(strip_one_leading_zero("0"), "0");
        assert_eq!(strip_one_leading_zero("75201"), "75201");
    }

    #[test]
    fn test_phone_formats() {
        let mut rng = rng();
        for _ in 0..100 {
            let out = phone_variant(Some("(214) 555-0199"), &mut rng).unwrap();
            assert!(digits_of(&out).ends_with("2145550199"), "{}", out);
        }
        assert_eq!(phone_variant(None, &mut rng), None);
        assert_eq!(phone_variant(Some("555-0199"), &mut rng).as_deref(), Some("555-0199"));
    }

    #[test]
    fn test_maybe_null_extremes() {
        let mut rng = rng();
        assert_eq!(maybe_null(Some(5), 0.0, &mut rng), Some(5));
        assert_eq!(maybe_null(Some(5), 1.0, &mut rng), None);
        assert_eq!(maybe_null::<i32, _>(None, 0.0, &mut rng), None);
    }

    #[test]
    fn test_tax_id_formats_by_source() {
        let mut rng = rng();
        assert_eq!(
            tax_id_variant(Some("123456789"), SourceSystem::Crm, &mut rng).as_deref(),
            Some("12-3456789")
        );
        assert_eq!(
            tax_id_variant(Some("12-3456789"), SourceSystem::Credentialing, &mut rng).as_deref(),
            Some("123456789")
        );
        assert_eq!(tax_id_variant(Some("12"), SourceSystem::Crm, &mut rng).as_deref(), Some("12"));
        assert_eq!(tax_id_variant(None, SourceSystem::Crm, &mut rng), None);
    }

    #[test]
    fn test_claims_tax_typo_keeps_digits() {
        let mut rng = rng();
        let mut typos = 0;
        for _ in 0..500 {
            let out = tax_id_variant(Some("12-3456789"), SourceSystem::Claims, &mut rng).unwrap();
            assert_eq!(out.len(), 9);
            let mut a: Vec<char> = out.chars().collect();
            let mut b: Vec<char> = "123456789".chars().collect();
            a.sort();
            b.sort();
            assert_eq!(a, b);
            assert_eq!(&out[..2], "12");
            if out != "123456789" {
                typos += 1;
            }
        }
        assert!(typos > 0);
    }

    #[test]
    fn test_stale_status() {
        let mut rng = rng();
        for _ in 0..100 {
            assert!(maybe_stale_status(true, SourceSystem::Claims, &mut rng));
            assert!(!maybe_stale_status(false, SourceSystem::Crm, &mut rng));
        }
        let stale = (0..2000)
            .filter(|_| maybe_stale_status(false, SourceSystem::Claims, &mut rng))
            .count();
        assert!(stale > 150 && stale < 450, "stale {}", stale);
    }

    proptest! {
        #[test]
        fn prop_crm_tax_id_keeps_digit_sequence(raw in "[0-9-]{0,12}", seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            if let Some(out) = tax_id_variant(Some(&raw), SourceSystem::Crm, &mut rng) {
                prop_assert_eq!(digits_of(&out), digits_of(&raw));
            }
        }

        #[test]
        fn prop_claims_zip_never_empty(zip in "0{0,3}[0-9]{1,5}", seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = zip_variant(Some(&zip), SourceSystem::Claims, &mut rng).unwrap();
            prop_assert!(!out.is_empty());
        }
    }
}
