use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("解析错误 {}: {message}", file.display())]
    ParseError { file: PathBuf, message: String },

    /// A precondition on the input type graph does not hold
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// A scalar or token kind the Any converter has no variant for
    #[error("未处理的类型: {0}")]
    UnhandledType(String),

    /// A type re-entered its own expansion
    #[error("循环引用的类型: {type_name}")]
    CyclicSchema { type_name: String },
}
