//! Human-readable record codes and stored file names.

use chrono::{DateTime, Utc};
use rand::Rng;

pub const ROUTE_CODE_PREFIX: &str = "RT";
pub const SUBMISSION_CODE_PREFIX: &str = "SUB";
pub const DOCUMENT_CODE_PREFIX: &str = "DOC";

/// `PREFIX-YYYYMMDD-XXXX` with `suffix_len` uppercase hex characters.
pub fn generate_code(prefix: &str, now: DateTime<Utc>, suffix_len: usize) -> String {
    format!("{}-{}-{}", prefix, now.format("%Y%m%d"), random_hex(suffix_len).to_uppercase())
}

pub fn route_code(now: DateTime<Utc>) -> String {
    generate_code(ROUTE_CODE_PREFIX, now, 4)
}

pub fn submission_code(now: DateTime<Utc>) -> String {
    generate_code(SUBMISSION_CODE_PREFIX, now, 6)
}

pub fn document_code(now: DateTime<Utc>) -> String {
    generate_code(DOCUMENT_CODE_PREFIX, now, 6)
}

/// `{unix_ts}_{16 hex}.{ext}`; the random part keeps concurrent uploads apart.
pub fn stored_file_name(now: DateTime<Utc>, extension: &str) -> String {
    format!("{}_{}.{}", now.timestamp(), random_hex(16), extension)
}

fn random_hex(len: usize) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| HEX[rng.gen_range(0..16)] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regex::Regex;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 8, 15, 0).unwrap()
    }

    #[test]
    fn test_route_code_format() {
        let code = route_code(fixed_now());
        assert!(Regex::new(r"^RT-20240309-[0-9A-F]{4}$").unwrap().is_match(&code), "{code}");
        assert!(crate::utils::validation::validate_route_code(&code).is_ok());
    }

    #[test]
    fn test_submission_and_document_codes() {
        assert!(Regex::new(r"^SUB-20240309-[0-9A-F]{6}$")
            .unwrap()
            .is_match(&submission_code(fixed_now())));
        assert!(Regex::new(r"^DOC-20240309-[0-9A-F]{6}$")
            .unwrap()
            .is_match(&document_code(fixed_now())));
    }

    #[test]
    fn test_stored_file_name() {
        let name = stored_file_name(fixed_now(), "pdf");
        let re = Regex::new(&format!(r"^{}_[0-9a-f]{{16}}\.pdf$", fixed_now().timestamp())).unwrap();
        assert!(re.is_match(&name), "{name}");
        assert_ne!(name, stored_file_name(fixed_now(), "pdf"));
    }
}
