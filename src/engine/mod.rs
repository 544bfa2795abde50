// ==========================================
// 按需印刷商城 - 引擎层
// ==========================================
// 职责: 属性矩阵展开 / 商品编号分配
// ==========================================

pub mod id_allocator;
pub mod matrix_expander;

pub use id_allocator::{next_id_after, IdentifierAllocator};
pub use matrix_expander::{expand, ExpandError, MatrixExpander, DEFAULT_MAX_COMBINATIONS};
