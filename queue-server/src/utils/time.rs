//! 时间工具函数 — 业务时区转换
//!
//! 所有持久化时间戳统一为 `i64` Unix millis。
//! 高峰时段判断在业务时区 (默认 Asia/Singapore) 的本地墙钟上进行，
//! 转换走 chrono-tz 的民用历法规则而非固定 UTC 偏移。

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// 当前时间，Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → DateTime<Utc>，越界取纪元
pub fn millis_to_utc(millis: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

/// 解析业务时区名称，失败回落到 Asia/Singapore
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!(
            "Unknown timezone '{}', falling back to Asia/Singapore",
            name
        );
        chrono_tz::Asia::Singapore
    })
}

/// UTC 时刻在业务时区的"日内分钟数" (0..1440)
pub fn local_minute_of_day(now: DateTime<Utc>, tz: Tz) -> u32 {
    use chrono::Timelike;
    let local = now.with_timezone(&tz);
    local.hour() * 60 + local.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn minute_of_day_converts_via_timezone() {
        let tz = chrono_tz::Asia::Singapore;
        // 2026-03-10 04:00 UTC == 12:00 SGT (UTC+8)
        let utc = Utc.with_ymd_and_hms(2026, 3, 10, 4, 0, 0).unwrap();
        assert_eq!(local_minute_of_day(utc, tz), 12 * 60);
    }

    #[test]
    fn unknown_timezone_falls_back_to_singapore() {
        assert_eq!(parse_timezone("Not/AZone"), chrono_tz::Asia::Singapore);
        assert_eq!(parse_timezone("Europe/Madrid"), chrono_tz::Europe::Madrid);
    }
}
