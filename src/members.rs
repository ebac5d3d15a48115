mod api_ext;
mod database_ext;
mod member;
mod member_validation;

pub use self::{
    api_ext::{MemberRegistrationParams, MembersApi},
    database_ext::MembersDatabaseExt,
    member::Member,
};
