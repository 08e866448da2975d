//! 标准阻塞流抽象（`std::io::Read`）的桥接层，仅在 `std` 特性下编译。
//!
//! # 教案背景（Why）
//! - 现成的解码器（解压器、反序列化器）普遍以 `impl Read` 作为输入抽象；
//!   为了让它们零改造地消费 [`ChunkQueue`]，需要把 [`Suspension`] 信号装进
//!   `io::Error` 的运输通道。
//! - `io::ErrorKind::WouldBlock` 的既有语义正是“现在没有数据、稍后重试”，
//!   与伪挂起完全同构；解码器内部对错误的透传会把信号原样抬升到调度器。
//!
//! # 合约说明（What）
//! - 空队列的 `read` 返回 `WouldBlock` 错误且内层负载为 `Suspension`，
//!   绝不返回 `Ok(0)`（0 从不用作 EOF）；
//! - 调度器侧用 [`Suspension::from_io`] 判别并还原信号，其余错误一律视为
//!   真实故障。

use std::io;

use crate::error::Suspension;
use crate::queue::ChunkQueue;

impl Suspension {
    /// 尝试从穿过 `io::Error` 通道的错误中还原挂起信号。
    ///
    /// - **输入**：被委托解码调用冒泡上来的 `io::Error`；
    /// - **输出**：内层负载确为 [`Suspension`] 时返回 `Some`，否则 `None`；
    /// - 解码器若在转发时丢弃了内层负载，仅凭 `WouldBlock` 也可自行判定，
    ///   但本方法只认可负载完整的信号，避免把第三方的非阻塞错误误读为挂起。
    pub fn from_io(err: &io::Error) -> Option<Suspension> {
        err.get_ref()
            .and_then(|inner| inner.downcast_ref::<Suspension>())
            .copied()
    }
}

impl From<Suspension> for io::Error {
    fn from(suspension: Suspension) -> Self {
        io::Error::new(io::ErrorKind::WouldBlock, suspension)
    }
}

impl io::Read for ChunkQueue {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_into(buf).map_err(io::Error::from)
    }
}
