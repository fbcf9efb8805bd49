use serde::Deserialize;

/// Subset of the `user.status` payload needed to enumerate classes.
#[derive(Debug, Clone, Deserialize)]
pub struct UserStatus {
    #[serde(default)]
    pub networks: Vec<CourseClass>,
}

/// A class network the user is enrolled in.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseClass {
    /// Network id, the handle every content call is scoped to.
    #[serde(rename = "id")]
    pub nid: String,
    /// Course number, e.g. "CSCI 360".
    #[serde(rename = "num", default)]
    pub course_number: String,
    #[serde(default)]
    pub name: String,
}
