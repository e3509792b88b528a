//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - 路径处理工具（文件扩展名获取）

pub mod path;
