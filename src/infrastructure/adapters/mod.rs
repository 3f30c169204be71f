//! 出站端口的具体适配器

pub mod epub;
pub mod storage;
