//! Public id generation shared by every store backend.
//!
//! Format: `profile_{millis}` for profile photos, `post_{millis}_{suffix}` for
//! post images, where `suffix` is nine random base36 characters.

use pixport_core::UploadKind;
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 9;

/// Generate a public id for `kind` at `now_millis` (unix epoch milliseconds)
pub fn generate_public_id<R: Rng>(kind: UploadKind, now_millis: i64, rng: &mut R) -> String {
    if kind.randomized_ids() {
        format!(
            "{}_{}_{}",
            kind.id_prefix(),
            now_millis,
            random_base36(rng, RANDOM_SUFFIX_LEN)
        )
    } else {
        format!("{}_{}", kind.id_prefix(), now_millis)
    }
}

/// `len` random characters from `[0-9a-z]`
pub fn random_base36<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect()
}
