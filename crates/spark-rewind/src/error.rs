use core::fmt;

/// `Suspension` 表示“当前没有数据可满足本次读取”的控制流信号。
///
/// # 设计背景（Why）
/// - 队列为空时，阻塞式读取接口按惯例应当挂起线程等待数据；在协作式调度下我们
///   改为立即以该信号失败，把“等待”外包给外层调度器，线程从不真正阻塞。
/// - 信号必须穿透被委托调用的任意深度（例如解压器内部的多层读取），最终到达
///   调度器；因此它刻意不携带任何负载或诊断信息——它是控制流，不是故障。
///
/// # 逻辑解析（How）
/// - 以零尺寸单元结构体建模，身份即语义；读取路径返回
///   `Result<usize, Suspension>` 的双态结果，而非抛出式传播。
/// - 启用 `std` 时可被包进 `io::ErrorKind::WouldBlock`，穿过标准
///   `Read` 抽象后由 [`Suspension::from_io`](crate::Suspension) 还原。
///
/// # 契约说明（What）
/// - 不是流结束指示：读取永不以 0 表达 EOF，枯竭一律上抛本信号。
/// - 恢复协议固定为：捕获 → `restore()` → `push` 新输入 → 整体重试被委托调用。
///   注意顺序：`restore()` 以快照整体覆盖在场状态，先 `push` 会丢弃新 chunk。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suspension;

impl fmt::Display for Suspension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no buffered input available; suspend and retry after push")
    }
}

impl core::error::Error for Suspension {}

/// `CheckpointViolation` 表示在没有活动快照时调用了 `restore`/`release`。
///
/// # 设计背景（Why）
/// - 检查点协议要求调度器在调用被委托操作前先 `checkpoint()`；若违反顺序，
///   回卷语义已无从谈起，属于调用方的编程错误而非运行时故障。
/// - 按协议约定此类错误应视为致命（fail fast），不做任何就地恢复；
///   以显式错误值而非静默退化暴露，便于契约测试锁定。
///
/// # 契约说明（What）
/// - `op` 记录违约的操作名（`"restore"` 或 `"release"`），仅用于排障输出。
/// - 返回该错误时在场队列状态保持不变。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckpointViolation {
    op: &'static str,
}

impl CheckpointViolation {
    pub(crate) fn new(op: &'static str) -> Self {
        Self { op }
    }

    /// 返回违约的操作名。
    pub fn operation(&self) -> &'static str {
        self.op
    }
}

impl fmt::Display for CheckpointViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} called without an active checkpoint", self.op)
    }
}

impl core::error::Error for CheckpointViolation {}
