//! Time-related utilities with clock abstraction for testability.

use chrono::{Local, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (seconds)
    fn now_epoch_secs(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        get_epoch_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_secs: i64) -> Self {
        Self {
            fixed_time: fixed_time_secs,
        }
    }
}

impl Clock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (seconds)
pub fn get_epoch_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Format a Unix timestamp (seconds) as local wall-clock time `HH:MM`.
///
/// Timestamps outside the range chrono can represent are shown as `--:--`.
pub fn format_hh_mm(timestamp_secs: i64) -> String {
    match Local.timestamp_opt(timestamp_secs, 0).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_non_zero_timestamp() {
        // テスト項目: SystemClock が 0 以外のタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp = clock.now_epoch_secs();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // テスト項目: SystemClock が呼び出すたびに減少しないタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp1 = clock.now_epoch_secs();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = clock.now_epoch_secs();

        // then (期待する結果):
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_consistent_timestamp() {
        // テスト項目: FixedClock が複数回呼び出しても同じタイムスタンプを返す
        // given (前提条件):
        let fixed_time = 1000;
        let clock = FixedClock::new(fixed_time);

        // when (操作):
        let timestamp1 = clock.now_epoch_secs();
        let timestamp2 = clock.now_epoch_secs();

        // then (期待する結果):
        assert_eq!(timestamp1, fixed_time);
        assert_eq!(timestamp2, fixed_time);
    }

    #[test]
    fn test_format_hh_mm_shape() {
        // テスト項目: タイムスタンプが HH:MM 形式に変換される
        // given (前提条件):
        let timestamp = 1672498800;

        // when (操作):
        let result = format_hh_mm(timestamp);

        // then (期待する結果):
        assert_eq!(result.len(), 5);
        assert_eq!(&result[2..3], ":");
        assert!(result[..2].parse::<u32>().unwrap() < 24);
        assert!(result[3..].parse::<u32>().unwrap() < 60);
    }

    #[test]
    fn test_format_hh_mm_out_of_range() {
        // テスト項目: 表現できないタイムスタンプはプレースホルダになる
        // given (前提条件):
        let timestamp = i64::MAX;

        // when (操作):
        let result = format_hh_mm(timestamp);

        // then (期待する結果):
        assert_eq!(result, "--:--");
    }
}
