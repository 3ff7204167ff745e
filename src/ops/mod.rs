pub mod like_ops;
pub mod task_ops;
