use serde::{Deserialize, Serialize};

/// Raw registration form input. Values are kept as submitted so that the form can be rendered back
/// together with the validation errors.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MemberRegistrationParams {
    pub invitation_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roll: String,
    pub contact: String,
    pub programme: String,
    pub semester: String,
    pub about: String,
}
