//! S3模块
//!
//! 该模块负责处理与S3存储桶的交互，包括客户端配置、对象存储抽象
//! 以及面向工作流的存储桶封装。

// 声明子模块
pub mod bucket;
pub mod store;

// 重新导出常用的类型
pub use bucket::Bucket;
pub use store::{ListPage, ObjectStore, S3ObjectStore};
