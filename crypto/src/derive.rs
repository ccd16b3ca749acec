//! Named resource-account address derivation.

use granary_types::{AccountAddress, InvalidAddress};
use sha3::{Digest, Sha3_256};

/// Derivation scheme byte for named resource accounts.
///
/// Appended after the seed so named derivation cannot collide with the
/// ledger's other derivation schemes.
pub const RESOURCE_ACCOUNT_SCHEME: u8 = 0xFF;

/// Derive the resource account controlled by `source` under `seed`.
///
/// Computes `SHA3-256(source_bytes || seed || 0xFF)`. Deterministic, total,
/// and fully offline: the same (source, seed) pair always yields the same
/// address, and distinct seeds under one source yield independent addresses.
pub fn resource_account_address(source: &AccountAddress, seed: &[u8]) -> AccountAddress {
    let mut hasher = Sha3_256::new();
    hasher.update(source.as_bytes());
    hasher.update(seed);
    hasher.update([RESOURCE_ACCOUNT_SCHEME]);
    let digest = hasher.finalize();

    let mut bytes = [0u8; AccountAddress::LENGTH];
    bytes.copy_from_slice(&digest);
    AccountAddress::new(bytes)
}

/// Convenience wrapper that parses `source` from hex first.
///
/// Fails with [`InvalidAddress`] if the source is not a well-formed address.
pub fn resource_account_address_hex(
    source: &str,
    seed: &[u8],
) -> Result<AccountAddress, InvalidAddress> {
    let source = AccountAddress::from_hex(source)?;
    Ok(resource_account_address(&source, seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let owner = AccountAddress::from_hex("0x1").unwrap();
        let a = resource_account_address(&owner, b"farm");
        let b = resource_account_address(&owner, b"farm");
        assert_eq!(a, b);
    }

    #[test]
    fn golden_vector_owner_one_seed_farm() {
        // Verifies the exact byte layout feeding the hash:
        // 32-byte address || seed || 0xFF.
        let owner = AccountAddress::from_hex("0x1").unwrap();
        let derived = resource_account_address(&owner, b"farm");
        assert_eq!(
            derived.to_hex(),
            "0xbd7d6699cefb79e62ee320ecca6eeffc03d871e77283ef24b6e59b4ff86b2999"
        );
    }

    #[test]
    fn golden_vector_owner_one_seed_bank() {
        let owner = AccountAddress::from_hex("0x1").unwrap();
        let derived = resource_account_address(&owner, b"bank");
        assert_eq!(
            derived.to_hex(),
            "0x528bd888b4ee19a6b79f59611d74ce90a428722196e503d926871d449918ed36"
        );
    }

    #[test]
    fn golden_vector_nested_derivation() {
        // The transmitter account hangs off an already-derived farm account.
        let publisher = AccountAddress::from_hex(
            "0x69c1b21fc28610043a57412568fd28d4199c0f57f90b1af8f687ec7fcc4ddd46",
        )
        .unwrap();
        let farm = resource_account_address(&publisher, b"farm");
        assert_eq!(
            farm.to_hex(),
            "0x062feb582b787f6842fb9c26e71012440b24c1a4956282576dec651cff221639"
        );
        let transmitter = resource_account_address(&farm, b"transmitter");
        assert_eq!(
            transmitter.to_hex(),
            "0xdcf15e5e36798020ed668b504b4798bdc529ef593f544fb061b53fb5e0751772"
        );
    }

    #[test]
    fn distinct_seeds_distinct_addresses() {
        let owner = AccountAddress::from_hex("0x1").unwrap();
        let farm = resource_account_address(&owner, b"farm");
        let bank = resource_account_address(&owner, b"bank");
        let transmitter = resource_account_address(&owner, b"transmitter");
        assert_ne!(farm, bank);
        assert_ne!(farm, transmitter);
        assert_ne!(bank, transmitter);
    }

    #[test]
    fn avalanche_on_owner_bits() {
        // Flipping any single bit of the owner address changes the output.
        let base_bytes = [0x5Au8; 32];
        let base = resource_account_address(&AccountAddress::new(base_bytes), b"farm");
        for byte in 0..32 {
            for bit in 0..8 {
                let mut flipped = base_bytes;
                flipped[byte] ^= 1 << bit;
                let derived = resource_account_address(&AccountAddress::new(flipped), b"farm");
                assert_ne!(derived, base, "bit {bit} of byte {byte} did not avalanche");
            }
        }
    }

    #[test]
    fn avalanche_on_seed_bits() {
        let owner = AccountAddress::from_hex("0x1").unwrap();
        let seed = *b"farm";
        let base = resource_account_address(&owner, &seed);
        for byte in 0..seed.len() {
            for bit in 0..8 {
                let mut flipped = seed;
                flipped[byte] ^= 1 << bit;
                let derived = resource_account_address(&owner, &flipped);
                assert_ne!(derived, base, "bit {bit} of seed byte {byte} did not avalanche");
            }
        }
    }

    #[test]
    fn hex_wrapper_rejects_malformed_source() {
        assert!(resource_account_address_hex("not-an-address", b"farm").is_err());
        assert!(resource_account_address_hex("", b"farm").is_err());
    }

    #[test]
    fn hex_wrapper_matches_parsed_derivation() {
        let owner = AccountAddress::from_hex("0x1").unwrap();
        assert_eq!(
            resource_account_address_hex("0x1", b"farm").unwrap(),
            resource_account_address(&owner, b"farm")
        );
    }
}
