//! SSE 实时订阅 - 总线到 HTTP 的桥接
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /api/events | GET | 全量事件流 | 无 |
//! | /api/events?restaurant_id=.. | GET | 按餐厅过滤的事件流 | 无 |
//!
//! 投递语义为 at-least-once：快照是全量的，消费者容忍重复；
//! 慢消费者掉队 (Lagged) 时丢弃旧消息，下一条快照即可恢复一致视图。

use std::convert::Infallible;

use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;

use crate::core::ServerState;
use shared::message::BusMessage;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(subscribe))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// 只接收该餐厅的事件；缺省接收全部
    pub restaurant_id: Option<String>,
}

fn wanted(msg: &BusMessage, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) => msg.restaurant_id.as_deref() == Some(f),
    }
}

fn to_event(msg: &BusMessage) -> Event {
    Event::default()
        .id(msg.request_id.to_string())
        .event(msg.event_type.to_string())
        .data(String::from_utf8_lossy(&msg.payload))
}

/// GET /api/events - SSE 事件流
pub async fn subscribe(
    State(state): State<ServerState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.bus.subscribe();
    let filter = query.restaurant_id.map(|id| {
        if id.contains(':') {
            id
        } else {
            format!("restaurant:{id}")
        }
    });

    tracing::debug!(filter = ?filter, "SSE subscriber connected");

    let stream = futures::stream::unfold((rx, filter), |(mut rx, filter)| async move {
        loop {
            match rx.recv().await {
                Ok(msg) if wanted(&msg, filter.as_deref()) => {
                    let event = to_event(&msg);
                    return Some((Ok(event), (rx, filter)));
                }
                Ok(_) => continue,
                // 掉队即跳过，快照语义保证下一条消息恢复视图
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "SSE subscriber lagged, dropping old snapshots");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
