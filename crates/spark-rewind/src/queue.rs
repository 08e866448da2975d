use alloc::collections::VecDeque;
use core::fmt;

use bytes::Bytes;

use crate::error::{CheckpointViolation, Suspension};

/// 队列三元状态的完整快照，存放于单一检查点槽位。
///
/// # 设计动机（Why）
/// - 被委托的阻塞式调用可能在失败前已经消费并弹出了若干 chunk，仅凭在场状态
///   无法回卷；必须在调用前留存一份独立副本。
/// - `Bytes` 不可变且引用计数，克隆 `VecDeque<Bytes>` 只复制句柄不复制负载，
///   快照在逻辑上与在场队列完全独立：后者随后被消费、清空都不影响前者。
///
/// # 契约说明（What）
/// - 三个字段必须取自同一瞬间，满足 `available == sum(len) - head_offset`。
#[derive(Clone, Debug)]
struct Snapshot {
    chunks: VecDeque<Bytes>,
    head_offset: usize,
    available: usize,
}

/// `ChunkQueue` 是推模式字节来源与拉模式阻塞式读取之间的缓冲桥。
///
/// # 设计背景（Why）
/// - 生产侧以 chunk 为单位推送输入并依赖 `push` 的布尔返回实现背压；
///   消费侧是一个期望同步 `read` 语义的解码器，两者节奏天然错配。
/// - 队列为空时读取以 [`Suspension`] 立即失败而非阻塞，把等待的职责交还
///   外层调度器；配合单槽检查点，调度器可以在补充输入后把整个解码调用
///   回卷重放。
///
/// # 结构解析（How）
/// - `chunks`：到达序保存的不可变 chunk，只在尾部追加、只在头部弹出；
/// - `head_offset`：最老 chunk 中已消费的字节数；
/// - `available`：全队列未消费字节总数，恒等于 `sum(len) - head_offset`；
/// - `bound`：构造时固定的软上限，`push` 以“推入前”的 `available` 判定；
/// - `checkpoint`：单槽快照，覆盖式写入。
///
/// # 契约说明（What）
/// - **不变量**：`chunks` 非空时 `0 <= head_offset < chunks[0].len()`；
///   为空时 `head_offset == 0`。空 chunk 从不入队（见 [`Self::push`]）。
/// - **前置条件**：所有操作由单一逻辑属主顺序调用；本类型无内部同步，
///   也不在调用之间做任何防护。
/// - **后置条件**：任何操作要么同步完成要么同步失败，绝不阻塞线程。
///
/// # 风险提示（Trade-offs）
/// - `bound` 不按单个 chunk 执行：`available` 低于上限时，一次超大 push 仍被
///   整体接纳，`available` 可短暂越界。这是对“一次接纳即完整接纳”的生产侧
///   假设的兼容保留，不应被视为可依赖的扩展点。
pub struct ChunkQueue {
    chunks: VecDeque<Bytes>,
    head_offset: usize,
    available: usize,
    bound: usize,
    checkpoint: Option<Snapshot>,
}

impl ChunkQueue {
    /// 以给定的缓冲字节上限构造空队列。
    ///
    /// - **输入**：`bound` 为 `available` 的软上限，构造后不可变更；
    /// - **后置条件**：队列为空、无检查点，`available() == 0`。
    pub fn with_bound(bound: usize) -> Self {
        Self {
            chunks: VecDeque::new(),
            head_offset: 0,
            available: 0,
            bound,
            checkpoint: None,
        }
    }

    /// 追加一个 chunk，返回是否被接纳。这是唯一的背压机制。
    ///
    /// # 执行步骤（How）
    /// 1. 以推入前的 `available` 与 `bound` 比较，已达上限则原样拒绝并返回
    ///    `false`，状态不变；
    /// 2. 空 chunk 视为已接纳但不入队，维持“队首 chunk 非空”的不变量，
    ///    同时避免读取路径出现 0 字节返回（0 从不用作 EOF）；
    /// 3. 否则追加到尾部并累加 `available`。
    ///
    /// # 契约说明（What）
    /// - chunk 的所有权随调用转移，入队后视为不可变；
    /// - 返回 `false` 不是错误：生产侧应据此暂停拉取上游，稍后重试；
    /// - 单个超过 `bound` 的 chunk 在 `available < bound` 时仍被整体接纳
    ///   （见类型级 Trade-offs）。
    pub fn push(&mut self, chunk: Bytes) -> bool {
        if self.available >= self.bound {
            return false;
        }
        if chunk.is_empty() {
            return true;
        }
        self.available += chunk.len();
        self.chunks.push_back(chunk);
        true
    }

    /// 以阻塞式读取的合约向 `dst` 拷贝字节，返回实际拷贝数。
    ///
    /// # 执行步骤（How）
    /// 1. 队列为空：立即以 [`Suspension`] 失败，状态分毫未动——绝不阻塞，
    ///    也绝不以 0 表示流结束；
    /// 2. 否则仅从最老的 chunk 取 `min(dst.len(), 剩余)` 字节拷贝；
    /// 3. 同步推进 `head_offset`、扣减 `available`；最老 chunk 被读尽时
    ///    将其弹出并把 `head_offset` 归零。
    ///
    /// # 契约说明（What）
    /// - 返回值可能小于 `dst.len()`（经典 blocking-read 语义），需要精确
    ///    字节数的调用方应自行循环；
    /// - 每次调用至多触及一个 chunk，不跨 chunk 聚合。
    pub fn read_into(&mut self, dst: &mut [u8]) -> Result<usize, Suspension> {
        let Some(head) = self.chunks.front() else {
            return Err(Suspension);
        };
        let head_len = head.len();
        debug_assert!(self.head_offset < head_len, "队首 chunk 不应已被读尽");
        let copied = dst.len().min(head_len - self.head_offset);
        dst[..copied].copy_from_slice(&head[self.head_offset..self.head_offset + copied]);
        self.available -= copied;
        self.head_offset += copied;
        if self.head_offset == head_len {
            self.chunks.pop_front();
            self.head_offset = 0;
        }
        Ok(copied)
    }

    /// 单字节便捷读取，与 [`Self::read_into`] 走同一路径。
    pub fn read_u8(&mut self) -> Result<u8, Suspension> {
        let mut byte = [0u8; 1];
        // 队列非空则队首 chunk 非空，必然恰好读到 1 字节。
        self.read_into(&mut byte)?;
        Ok(byte[0])
    }

    /// 把在场状态完整存入检查点槽位，覆盖既有快照。
    ///
    /// 必须在调用任何可能中途以 [`Suspension`] 失败的被委托操作之前执行：
    /// 该操作失败前可能已经消费（并弹出）了若干 chunk。
    pub fn checkpoint(&mut self) {
        self.checkpoint = Some(Snapshot {
            chunks: self.chunks.clone(),
            head_offset: self.head_offset,
            available: self.available,
        });
    }

    /// 以检查点快照整体覆盖在场状态；快照保留，可重复回卷。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：存在活动快照，否则返回 [`CheckpointViolation`]，
    ///   属于调度器的编程错误，应视为致命；
    /// - **后置条件**：`chunks`、`head_offset`、`available` 与快照瞬间
    ///   逐字节一致；检查点槽位不受影响。
    /// - 注意恢复协议的顺序：先 `restore()` 再 `push` 新输入。覆盖语义下
    ///   反过来会把刚推入的 chunk 一并抹掉。
    pub fn restore(&mut self) -> Result<(), CheckpointViolation> {
        let Some(snapshot) = self.checkpoint.as_ref() else {
            return Err(CheckpointViolation::new("restore"));
        };
        self.chunks = snapshot.chunks.clone();
        self.head_offset = snapshot.head_offset;
        self.available = snapshot.available;
        Ok(())
    }

    /// 丢弃检查点槽位的内容，不触碰在场状态。
    ///
    /// 在被委托操作最终成功、已消费输入不再需要回卷能力时调用；
    /// 无活动快照时同样返回 [`CheckpointViolation`]。
    pub fn release(&mut self) -> Result<(), CheckpointViolation> {
        match self.checkpoint.take() {
            Some(_) => Ok(()),
            None => Err(CheckpointViolation::new("release")),
        }
    }

    /// 把被委托的解码调用结构化为单个可重试单元。
    ///
    /// # 设计意图（Why）
    /// - 恢复协议的四个步骤（checkpoint → 调用 → 失败回卷 / 成功释放）极易
    ///   在手写时遗漏顺序；本方法把它收敛为一个作用域。
    ///
    /// # 执行步骤（How）
    /// 1. 先覆盖式建立检查点；
    /// 2. 运行 `op`；成功则释放槽位并透传结果；
    /// 3. 以 [`Suspension`] 失败则回卷在场状态，快照保留——调度器补充输入
    ///    后整体重试（重试会重新建立等价的检查点）。
    ///
    /// # 契约说明（What）
    /// - **前置条件**：`op` 不得自行调用 `checkpoint`/`restore`/`release`
    ///   （槽位是单槽覆盖语义）；并且 `op` 必须在对外提交任何结果之前完成
    ///    其全部读取——回卷只作用于本队列，无法撤销 `op` 自身的私有进度。
    /// - **后置条件**：`Ok` 时无活动快照；`Err` 时在场状态等于进入本方法
    ///   时的状态，且快照仍然有效。
    pub fn with_checkpoint<T, F>(&mut self, op: F) -> Result<T, Suspension>
    where
        F: FnOnce(&mut Self) -> Result<T, Suspension>,
    {
        self.checkpoint();
        match op(self) {
            Ok(value) => {
                self.checkpoint = None;
                Ok(value)
            }
            Err(suspension) => {
                if let Some(snapshot) = self.checkpoint.as_ref() {
                    self.chunks = snapshot.chunks.clone();
                    self.head_offset = snapshot.head_offset;
                    self.available = snapshot.available;
                }
                Err(suspension)
            }
        }
    }

    /// 返回当前未消费的字节总数。
    pub fn available(&self) -> usize {
        self.available
    }

    /// 返回构造时固定的缓冲上限。
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// 队列是否为空（下一次读取将以 [`Suspension`] 失败）。
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// 返回当前缓冲的 chunk 数量。
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// 是否存在活动的检查点快照。
    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }
}

impl fmt::Debug for ChunkQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkQueue")
            .field("chunk_count", &self.chunks.len())
            .field("head_offset", &self.head_offset)
            .field("available", &self.available)
            .field("bound", &self.bound)
            .field("has_checkpoint", &self.checkpoint.is_some())
            .finish()
    }
}
