//! Chunk a small maintenance-manual excerpt and print the scored output.
//!
//! Run with: `cargo run --example chunk_and_score`

use stratus::{ChunkingEngine, DocumentMeta};

fn main() -> stratus::Result<()> {
    let engine = ChunkingEngine::new();
    let meta = DocumentMeta::new("amm_ch29.txt").with_title("液压系统维修手册");

    let text = "第一章 液压系统维修程序\n\n\
                警告: 维修发动机液压系统前必须释放系统压力，确认起落架安全销已经安装。\n\n\
                步骤1 检查液压系统压力表读数为 0 psi。\n\
                步骤2 断开液压管路接头并更换密封圈。\n\
                步骤3 安装新的过滤器并恢复管路连接。\n\n\
                全部步骤执行完毕后检查系统无泄漏，维修工作完成。";

    let chunks = engine.chunk_document(text, &meta)?;

    println!("{} chunk(s):\n", chunks.len());
    for chunk in &chunks {
        println!(
            "[{}] type={:?} chars={} quality={:.3}",
            chunk.metadata.chunk_id, chunk.metadata.chunk_type, chunk.character_count, chunk.quality_score
        );
        println!("{}\n", chunk.content);
    }

    Ok(())
}
