//! 消息总线模块
//!
//! 每次成功的变更操作后，引擎把受影响餐厅的全量有序等待列表
//! (或更新后的餐厅记录) 发布到总线；订阅端 (SSE 桥、进程内观察者)
//! 收到完整快照。投递为 at-least-once，订阅端需容忍重复快照。

mod bus;

pub use bus::MessageBus;
