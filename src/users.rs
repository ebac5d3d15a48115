mod api_ext;
mod database_ext;
mod user;

pub use self::{api_ext::UsersApi, database_ext::UsersDatabaseExt, user::User};
pub(crate) use self::database_ext::insert_user;
