mod task_state;

pub use self::task_state::TaskState;
