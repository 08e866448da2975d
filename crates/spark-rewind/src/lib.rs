#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

//! `spark-rewind` 将推模式的字节来源桥接为拉模式的阻塞式读取接口。
//!
//! # 教案背景（Why）
//! - 传统解压/解码例程（如封装成同步 `read` 的流式解压器）期望一个“阻塞直到有数据”的
//!   字节流；而协作式调度下的输入是以分块（chunk）推送、随时可能暂时枯竭的。
//! - 本 crate 用“伪挂起”手法弥合两者：队列为空时读取操作立即以 [`Suspension`]
//!   信号失败，绝不真正阻塞线程；外层调度器捕获信号、补充输入后，从检查点整体重放
//!   被打断的解码调用。
//! - 因为被委托的解码调用在失败前可能已经消费并丢弃了若干 chunk，队列内建
//!   checkpoint/restore 快照机制，保证重放前可以回卷到已知安全点。
//!
//! # 使用概览（How）
//! - 生产侧反复调用 [`ChunkQueue::push`]，以返回的布尔值实现背压：被拒绝即暂停拉取上游。
//! - 消费侧把整个解码调用包进 [`ChunkQueue::with_checkpoint`]，或手动遵循协议：
//!   `checkpoint()` → 调用解码器 → 捕获 [`Suspension`] 后先 `restore()` 再 `push`
//!   新输入 → 从头重试 → 成功后 `release()`。
//! - 启用 `std` 特性时，`ChunkQueue` 直接实现 [`std::io::Read`]，空队列映射为
//!   `WouldBlock` 错误并携带 `Suspension`，可交给任何接受 `impl Read` 的解码器。
//!
//! # 合约说明（What）
//! - 单一逻辑属主顺序调用，无内部锁、无内部等待/通知；所有操作同步完成或同步失败。
//! - `Suspension` 不表示流结束：读取永不以 0 表示 EOF，枯竭一律以信号上抛。
//! - `bound` 是唯一的资源旋钮，封顶“已缓冲未消费”的字节总量。
//!
//! # 风险提示与边界（Trade-offs）
//! - 伪挂起只在“调用方在对外提交结果前完成其全部读取”的前提下成立：若被委托的
//!   读取方自带前瞻缓冲或在两次必须视为原子的读取之间推进了自身状态，`restore()`
//!   只能回卷本队列，无法回卷对方的私有进度。这是对所有调用方的根本约束，
//!   详见 [`ChunkQueue::with_checkpoint`] 的前置条件。
//! - 检查点槽位是单槽覆盖语义：同一时刻只允许一个在途的可重试操作。

extern crate alloc;

mod error;
mod queue;

#[cfg(feature = "std")]
mod io;

pub use crate::error::{CheckpointViolation, Suspension};
pub use crate::queue::ChunkQueue;
