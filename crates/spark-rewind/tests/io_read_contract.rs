//! `io_read_contract` 集成测试：验证 `std::io::Read` 桥接层与恢复协议的端到端协作。
//!
//! # 测试总览（Why）
//! - 空队列必须映射为 `WouldBlock` 错误而非 `Ok(0)`，且内层负载可还原为
//!   [`Suspension`]；
//! - 用一个只认识 `impl Read` 的微型帧解码器模拟被委托操作，驱动完整的
//!   “挂起 → 回卷 → 补输入 → 重放”调度循环。

use std::io::{self, Read};

use bytes::Bytes;
use spark_rewind::{ChunkQueue, Suspension};

/// 空队列的标准读取应返回 WouldBlock，且能还原出挂起信号。
#[test]
fn empty_queue_maps_to_would_block_with_suspension_payload() {
    let mut queue = ChunkQueue::with_bound(8);
    let mut buf = [0u8; 4];
    let err = queue.read(&mut buf).expect_err("空队列不得返回 Ok(0)");
    assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
    assert_eq!(Suspension::from_io(&err), Some(Suspension));
}

/// 非挂起的 io 错误不应被误判为挂起信号。
#[test]
fn foreign_io_errors_are_not_mistaken_for_suspension() {
    let unrelated = io::Error::new(io::ErrorKind::WouldBlock, "somebody else's nonblocking error");
    assert_eq!(Suspension::from_io(&unrelated), None);
    let hard = io::Error::new(io::ErrorKind::InvalidData, "corrupt stream");
    assert_eq!(Suspension::from_io(&hard), None);
}

/// 标准读取路径与 `read_into` 共享游标，数据逐字节一致。
#[test]
fn read_trait_yields_identical_bytes() {
    let mut queue = ChunkQueue::with_bound(16);
    assert!(queue.push(Bytes::from_static(b"chunk-a")));
    assert!(queue.push(Bytes::from_static(b"b")));
    let mut out = Vec::new();
    let mut buf = [0u8; 3];
    loop {
        match queue.read(&mut buf) {
            Ok(copied) => out.extend_from_slice(&buf[..copied]),
            Err(err) => {
                assert_eq!(Suspension::from_io(&err), Some(Suspension));
                break;
            }
        }
    }
    assert_eq!(out, b"chunk-ab");
}

/// 微型帧解码器：1 字节长度前缀 + 负载，仅依赖 `impl Read`。
///
/// 故意使用 `read_exact`：它在中途失败前可能已经消费了若干字节，
/// 这正是检查点协议要兜底的场景。
fn decode_frame(reader: &mut impl Read) -> io::Result<Vec<u8>> {
    let mut len = [0u8; 1];
    reader.read_exact(&mut len)?;
    let mut payload = vec![0u8; len[0] as usize];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

/// 完整调度循环：解码器因数据不足挂起两次，补输入并重放后最终成功。
#[test]
fn scheduler_loop_replays_decoder_until_input_suffices() {
    let mut queue = ChunkQueue::with_bound(64);
    // 帧为 [4, 'd','a','t','a']，输入被拆成三段陆续到达。
    let mut arrivals = vec![
        Bytes::from_static(&[4]),
        Bytes::from_static(b"da"),
        Bytes::from_static(b"ta"),
    ]
    .into_iter();

    assert!(queue.push(arrivals.next().expect("首段输入")));

    let mut attempts = 0;
    let payload = loop {
        attempts += 1;
        let outcome = queue.with_checkpoint(|q| {
            decode_frame(q).map_err(|err| {
                Suspension::from_io(&err).expect("解码器只应因数据不足而失败")
            })
        });
        match outcome {
            Ok(payload) => break payload,
            Err(Suspension) => {
                // 回卷已由 with_checkpoint 完成；此刻才补充新输入。
                let chunk = arrivals.next().expect("挂起次数不应超过输入分段数");
                assert!(queue.push(chunk));
            }
        }
    };

    assert_eq!(payload, b"data");
    assert_eq!(attempts, 3, "前两次尝试都应因数据不足而挂起");
    assert!(queue.is_empty(), "帧被完整消费");
    assert!(!queue.has_checkpoint(), "成功路径应释放检查点");
}
