//! 宽限期扫描器
//!
//! 到期时间是持久化的绝对时间戳，任何读者都能检测过期
//! (lazy 路径见 `QueueEngine::get_entry`)。本扫描器负责 eager 物化：
//! 周期性找出所有已过期的条目并执行 skip，保证没有任何会话在看时
//! 过期也不会悬挂在 called 状态。进程重启后无需恢复任何内存定时器，
//! 第一轮扫描即可补上漏掉的转换。

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::engine::QueueEngine;

/// 宽限期后台扫描器
///
/// 注册为 `TaskKind::Periodic`，在 `start_background_tasks()` 中启动。
pub struct GraceSweeper {
    engine: Arc<QueueEngine>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl GraceSweeper {
    pub fn new(engine: Arc<QueueEngine>, interval: Duration, shutdown: CancellationToken) -> Self {
        Self {
            engine,
            interval,
            shutdown,
        }
    }

    /// 主循环：立即补扫一轮 → 周期触发
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Grace sweeper started");

        // 启动补扫：恢复进程宕机期间错过的到期转换
        let swept = self.engine.sweep_expired().await;
        if swept > 0 {
            tracing::info!(swept, "Grace sweeper caught up on startup");
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker.tick().await; // first tick fires immediately, already covered

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let swept = self.engine.sweep_expired().await;
                    if swept > 0 {
                        tracing::debug!(swept, "Grace sweep pass completed");
                    }
                }
                _ = self.shutdown.cancelled() => break,
            }
        }

        tracing::info!("Grace sweeper stopped");
    }
}
