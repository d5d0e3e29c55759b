use thiserror::Error;

/// 服务器启动/运行期错误
///
/// 请求处理期的错误走 [`AppError`](crate::utils::AppError)，
/// 这里只覆盖启动和关闭路径。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("数据库初始化失败: {0}")]
    Database(String),

    #[error("无法绑定端口: {0}")]
    Bind(#[from] std::io::Error),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 启动路径的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
