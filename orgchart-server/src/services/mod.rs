//! 业务服务层
//!
//! - [`hierarchy`]: 子树、树视图、重新指派
//! - [`query`]: 搜索词与排序解析
//! - [`bootstrap`]: 初始管理员

pub mod bootstrap;
pub mod hierarchy;
pub mod query;
