//! Ticket code generation
//!
//! Short human-shareable codes. Generation entropy is not the uniqueness
//! guarantee - the unique index on `booking.ticket_code` is; on a
//! collision the ledger regenerates and retries.

use rand::Rng;

const CODE_LEN: usize = 8;
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate an 8-character upper-case alphanumeric ticket code
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_short_and_upper_case_alphanumeric() {
        for _ in 0..100 {
            let code = generate();
            assert_eq!(code.len(), CODE_LEN);
            assert!(
                code.bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
            );
        }
    }
}
