//! Generates the opaque, time-ordered keys assigned to pushed records.

use rand::Rng;

/// The alphabet for push keys, in ascending ASCII order so that keys sort
/// lexicographically in the order they were generated.
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIMESTAMP_LENGTH: usize = 8;
const RANDOM_LENGTH: usize = 12;

/// The length of every generated push key.
pub const PUSH_ID_LENGTH: usize = TIMESTAMP_LENGTH + RANDOM_LENGTH;

/// Creates push keys made of eight characters encoding the creation time in
/// milliseconds followed by twelve random characters.
///
/// Keys generated within the same millisecond reuse the previous random
/// suffix incremented by one, so keys from one generator are strictly
/// increasing.
#[derive(Debug, Default)]
pub(crate) struct PushIdGenerator {
    last_timestamp: u64,
    last_random: [u8; RANDOM_LENGTH],
}

impl PushIdGenerator {
    /// Create the next key for a record created at `timestamp_millis`.
    pub(crate) fn next_id(&mut self, timestamp_millis: u64, rng: &mut impl Rng) -> String {
        let is_duplicate_time = timestamp_millis == self.last_timestamp;
        self.last_timestamp = timestamp_millis;

        let mut time_chars = [0u8; TIMESTAMP_LENGTH];
        let mut remaining = timestamp_millis;
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }

        if is_duplicate_time {
            self.increment_random();
        } else {
            for digit in self.last_random.iter_mut() {
                *digit = rng.gen_range(0..64);
            }
        }

        let mut id = String::with_capacity(PUSH_ID_LENGTH);
        id.extend(time_chars.iter().map(|&c| c as char));
        id.extend(
            self.last_random
                .iter()
                .map(|&digit| PUSH_CHARS[digit as usize] as char),
        );

        id
    }

    fn increment_random(&mut self) {
        for digit in self.last_random.iter_mut().rev() {
            if *digit == 63 {
                *digit = 0;
            } else {
                *digit += 1;
                return;
            }
        }
    }
}
