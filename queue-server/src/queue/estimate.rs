//! 等待时间估算
//!
//! 纯函数：位置 → 等待区间，队列长度/平均等待 → 强度分数，
//! 墙钟 → 高峰时段。引擎在每次排序变化后按新位置重算估计。

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::utils::time;
use shared::models::{IntensityTier, WaitTimeRange};

/// 每个排队位置的等待下界 (分钟)
pub const MIN_MINUTES_PER_POSITION: u32 = 8;
/// 每个排队位置的等待上界 (分钟)
pub const MAX_MINUTES_PER_POSITION: u32 = 12;

/// Position-derived wait estimate, minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitEstimate {
    pub min: u32,
    pub max: u32,
    /// round((min + max) / 2)
    pub expected: u32,
}

impl WaitEstimate {
    pub fn range(&self) -> WaitTimeRange {
        WaitTimeRange {
            min: self.min,
            max: self.max,
        }
    }
}

/// 位置 → 等待估计。position 为 1-based。
pub fn estimate(position: u32) -> WaitEstimate {
    let min = position * MIN_MINUTES_PER_POSITION;
    let max = position * MAX_MINUTES_PER_POSITION;
    let expected = ((min + max) as f64 / 2.0).round() as u32;
    WaitEstimate { min, max, expected }
}

/// 队列强度分数 0-100
///
/// 长度与平均等待各占最多 50 分。仅用于展示分级，不参与准入控制。
pub fn queue_intensity(queue_length: u32, avg_wait_minutes: u32) -> u32 {
    let length_score = (queue_length * 10).min(50);
    let wait_score = (avg_wait_minutes / 2).min(50);
    (length_score + wait_score).min(100)
}

/// 强度分数 → 展示层级
pub fn intensity_tier(score: u32) -> IntensityTier {
    match score {
        0..=33 => IntensityTier::Low,
        34..=66 => IntensityTier::Moderate,
        _ => IntensityTier::High,
    }
}

// 高峰窗口，业务时区本地分钟数 (含边界)
const LUNCH_START: u32 = 11 * 60 + 30;
const LUNCH_END: u32 = 14 * 60;
const DINNER_START: u32 = 18 * 60;
const DINNER_END: u32 = 21 * 60;

/// 当前是否高峰时段 (午市 11:30-14:00 或晚市 18:00-21:00，业务时区)
pub fn is_peak_hours(now: DateTime<Utc>, tz: Tz) -> bool {
    let minute = time::local_minute_of_day(now, tz);
    (LUNCH_START..=LUNCH_END).contains(&minute) || (DINNER_START..=DINNER_END).contains(&minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sgt(h: u32, m: u32) -> DateTime<Utc> {
        // SGT = UTC+8, no DST
        chrono_tz::Asia::Singapore
            .with_ymd_and_hms(2026, 5, 20, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn estimate_matches_reference_numbers() {
        let e1 = estimate(1);
        assert_eq!((e1.min, e1.max, e1.expected), (8, 12, 10));

        let e2 = estimate(2);
        assert_eq!((e2.min, e2.max, e2.expected), (16, 24, 20));
    }

    #[test]
    fn estimate_is_monotonic_in_position() {
        for p in 1..100 {
            assert!(estimate(p + 1).expected >= estimate(p).expected);
            assert!(estimate(p + 1).min >= estimate(p).min);
            assert!(estimate(p + 1).max >= estimate(p).max);
        }
    }

    #[test]
    fn intensity_caps_at_100() {
        assert_eq!(queue_intensity(0, 0), 0);
        // 3 parties, 30min average: 30 + 15 = 45
        assert_eq!(queue_intensity(3, 30), 45);
        // both components capped at 50
        assert_eq!(queue_intensity(20, 500), 100);
    }

    #[test]
    fn intensity_tiers() {
        assert_eq!(intensity_tier(0), IntensityTier::Low);
        assert_eq!(intensity_tier(45), IntensityTier::Moderate);
        assert_eq!(intensity_tier(80), IntensityTier::High);
    }

    #[test]
    fn peak_hours_truth_table() {
        let tz = chrono_tz::Asia::Singapore;
        assert!(is_peak_hours(sgt(12, 0), tz));
        assert!(is_peak_hours(sgt(19, 0), tz));
        assert!(!is_peak_hours(sgt(9, 0), tz));
        assert!(!is_peak_hours(sgt(16, 0), tz));
    }

    #[test]
    fn peak_hours_boundaries_inclusive() {
        let tz = chrono_tz::Asia::Singapore;
        assert!(is_peak_hours(sgt(11, 30), tz));
        assert!(is_peak_hours(sgt(14, 0), tz));
        assert!(!is_peak_hours(sgt(14, 1), tz));
        assert!(is_peak_hours(sgt(21, 0), tz));
        assert!(!is_peak_hours(sgt(21, 1), tz));
    }
}
