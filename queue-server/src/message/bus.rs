//! 消息总线核心实现
//!
//! # 架构
//!
//! ```text
//! Engine ──▶ publish() ──▶ broadcast::Sender<BusMessage>
//!                               │
//!                  ┌────────────┼────────────┐
//!                  ▼            ▼            ▼
//!              SSE bridge   in-process    tests
//!                           subscribers
//! ```
//!
//! 慢消费者掉队 (Lagged) 时丢弃旧快照即可 —— 快照是全量的，
//! 下一条消息就能恢复一致视图。

use shared::message::BusMessage;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// 消息总线 - 快照扇出
#[derive(Debug, Clone)]
pub struct MessageBus {
    tx: broadcast::Sender<BusMessage>,
}

impl MessageBus {
    /// 创建默认容量的消息总线
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的消息总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 发布消息到所有订阅者
    ///
    /// 无订阅者时发送失败是正常情况，静默忽略。
    pub fn publish(&self, msg: BusMessage) {
        let _ = self.tx.send(msg);
    }

    /// 订阅总线
    pub fn subscribe(&self) -> broadcast::Receiver<BusMessage> {
        self.tx.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::EventType;

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let bus = MessageBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(BusMessage::new(EventType::Notification, vec![1, 2, 3]));

        let m1 = rx1.recv().await.unwrap();
        let m2 = rx2.recv().await.unwrap();
        assert_eq!(m1.payload, vec![1, 2, 3]);
        assert_eq!(m1.request_id, m2.request_id);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_noop() {
        let bus = MessageBus::new();
        bus.publish(BusMessage::new(EventType::Notification, vec![]));
        assert_eq!(bus.subscriber_count(), 0);
    }
}
