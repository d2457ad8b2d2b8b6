use chrono::Local;
use rand::{rngs::OsRng, seq::SliceRandom};

const RANDOM_SEGMENT_LEN: usize = 5;
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a transaction id in the shape `YYMMDD-HHMMSS-XXXXX`.
///
/// eSewa accepts letters, digits and hyphens only. The trailing segment is five characters drawn
/// from the OS entropy source, so ids can be generated concurrently from independent processes
/// without coordination.
pub fn new_transaction_uuid() -> String {
    let now = Local::now();
    let stamp = now.format("%y%m%d-%H%M%S");
    let mut rng = OsRng;
    let suffix: String =
        (0..RANDOM_SEGMENT_LEN).map(|_| *ALPHABET.choose(&mut rng).expect("alphabet is non-empty") as char).collect();
    format!("{stamp}-{suffix}")
}

#[cfg(test)]
mod test {
    use regex::Regex;

    use super::new_transaction_uuid;

    #[test]
    fn matches_the_gateway_character_set() {
        let re = Regex::new(r"^\d{6}-\d{6}-[A-Z0-9]{5}$").unwrap();
        for _ in 0..100 {
            let id = new_transaction_uuid();
            assert!(re.is_match(&id), "unexpected transaction id shape: {id}");
        }
    }

    #[test]
    fn successive_ids_differ() {
        let ids: Vec<String> = (0..50).map(|_| new_transaction_uuid()).collect();
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(ids.len(), unique.len());
    }
}
