//! Typing cadence.
//!
//! One delay formula drives everything; events differ only in how many
//! delay steps they consume. The step counts are the animation's reviewable
//! cadence table.

use std::time::Duration;

use rand::Rng;

/// Tab stop width for tab expansion.
pub const TAB_SIZE: usize = 8;

/// Steps consumed while a regular character is pending.
pub const CHAR_DWELL: u32 = 3;
/// Steps consumed while a tab is pending.
pub const TAB_DWELL: u32 = 6;
/// Steps consumed after a line wrap.
pub const WRAP_DWELL: u32 = 2;
/// Steps the wrong character stays visible before correction.
pub const MISTAKE_WRONG_DWELL: u32 = 5;
/// Steps after erasing the wrong character, before the real one appears.
pub const MISTAKE_SETTLE_DWELL: u32 = 10;
/// Steps the cursor block flashes after a finished line.
pub const EOL_FLASH_DWELL: u32 = 6;

/// One randomized delay step for the given speed (1-100).
///
/// `value = 100 - speed`; the step is `(value + random(0..=value-1)) / 1500`
/// seconds, floored at `1/1500`. Higher speed means a shorter and less
/// variable delay; speed 100 always yields the minimum.
pub fn delay(speed: u8, rng: &mut impl Rng) -> Duration {
    let value = 100u32.saturating_sub(speed as u32);
    let headroom = value.saturating_sub(1);
    let steps = (value + rng.gen_range(0..=headroom)).max(1);
    Duration::from_secs_f64(f64::from(steps) / 1500.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_bounded_for_every_speed() {
        let mut rng = rand::thread_rng();
        for speed in 1..=100u8 {
            let value = u64::from(100 - speed);
            let lo = Duration::from_secs_f64(value.max(1) as f64 / 1500.0);
            let hi = Duration::from_secs_f64((2 * value).saturating_sub(1).max(1) as f64 / 1500.0);
            for _ in 0..50 {
                let d = delay(speed, &mut rng);
                assert!(d >= lo, "speed {speed}: {d:?} < {lo:?}");
                assert!(d <= hi, "speed {speed}: {d:?} > {hi:?}");
                assert!(d > Duration::ZERO);
            }
        }
    }

    #[test]
    fn top_speed_has_no_randomness_headroom() {
        let mut rng = rand::thread_rng();
        let expected = Duration::from_secs_f64(1.0 / 1500.0);
        for _ in 0..20 {
            assert_eq!(delay(100, &mut rng), expected);
        }
    }
}
