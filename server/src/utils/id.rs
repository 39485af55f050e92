//! ID and code generation
//!
//! Three flavors of identifier live in the system:
//! - snowflake-style `i64` row ids for every table with a numeric key
//! - public user codes (`EVT-8X29A`) handed out over email
//! - settlement references: gateway order ids (`ORD_<hex>`) and cash
//!   token codes (5 chars, typed in by a cashier)

use rand::Rng;

use super::time::now_millis;

/// Generate a Snowflake-style i64 for use as a row ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at fest scale)
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Alphabet for human-facing codes: uppercase letters and digits.
const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn random_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Generate a public user code like `EVT-8X29A`.
///
/// Callers must collision-check against the store and retry; the code is
/// short on purpose (it is read out at the gate).
pub fn generate_uid() -> String {
    format!("EVT-{}", random_code(5))
}

/// Generate a gateway order id like `ORD_1f9c2d4a8b3e`.
pub fn generate_order_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD_{}", &hex[..12])
}

/// Generate a cash token code (5 chars, cashier-readable).
///
/// Collision-checked by the ledger on insert.
pub fn generate_token_code() -> String {
    random_code(5)
}

/// Settlement reference for a redeemed cash token.
///
/// Shaped like an order id so registrations join on one reference type
/// regardless of payment mode.
pub fn cash_order_id(token: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("CSH_{}_{}", token, &hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond collisions are possible but vanishingly rare
        // with 12 random bits; distinct values across 100 draws is a
        // sanity check, not a proof.
        let ids: std::collections::HashSet<i64> = (0..100).map(|_| snowflake_id()).collect();
        assert!(ids.len() > 90);
    }

    #[test]
    fn uid_has_expected_shape() {
        let uid = generate_uid();
        assert!(uid.starts_with("EVT-"));
        assert_eq!(uid.len(), 9);
        assert!(uid[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn order_id_has_expected_shape() {
        let id = generate_order_id();
        assert!(id.starts_with("ORD_"));
        assert_eq!(id.len(), 16);
    }

    #[test]
    fn token_code_is_five_chars() {
        let code = generate_token_code();
        assert_eq!(code.len(), 5);
    }

    #[test]
    fn cash_reference_embeds_token() {
        let reference = cash_order_id("AB12C");
        assert!(reference.starts_with("CSH_AB12C_"));
    }
}
