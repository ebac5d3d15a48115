mod api_ext;
mod database_ext;
mod email;
mod send_invite_task;
mod task;
mod task_error;
mod task_function;

pub use self::{
    api_ext::TasksApi,
    database_ext::TasksDatabaseExt,
    email::Email,
    send_invite_task::SendInviteTask,
    task::Task,
    task_error::TaskError,
    task_function::TaskFunction,
};
pub(crate) use self::database_ext::insert_send_invite_task;
