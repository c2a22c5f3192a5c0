pub mod present;
pub mod task_ops;
