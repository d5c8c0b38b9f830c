//! Serde models of the Moodle web-service response shapes.
//!
//! Only the fields the tools read are typed; where a tool passes a record
//! through untouched (assignment and quiz listings, grade values) the
//! remainder is kept as raw JSON so nothing is silently dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// core_enrol_get_enrolled_users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct EnrolledUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Role {
    pub shortname: String,
}

impl EnrolledUser {
    pub fn is_student(&self) -> bool {
        self.roles.iter().any(|r| r.shortname == "student")
    }
}

// ---------------------------------------------------------------------------
// mod_assign_get_assignments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentsResponse {
    #[serde(default)]
    pub courses: Vec<CourseAssignments>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseAssignments {
    pub id: u64,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

/// One assignment. `id` and `name` drive the dispatch logic; everything else
/// the remote sent rides along in `extra` and is re-emitted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

// ---------------------------------------------------------------------------
// mod_quiz_get_quizzes_by_courses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizzesResponse {
    #[serde(default)]
    pub quizzes: Vec<Value>,
}

// ---------------------------------------------------------------------------
// mod_assign_get_submissions / mod_assign_get_grades
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionsResponse {
    #[serde(default)]
    pub assignments: Vec<AssignmentSubmissions>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentSubmissions {
    pub assignmentid: u64,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub userid: u64,
    #[serde(default)]
    pub status: String,
    /// Seconds since epoch.
    #[serde(default)]
    pub timemodified: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradesResponse {
    #[serde(default)]
    pub assignments: Vec<AssignmentGrades>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentGrades {
    pub assignmentid: u64,
    #[serde(default)]
    pub grades: Vec<GradeEntry>,
}

/// Moodle reports assignment grades as strings like `"85.00"`; the value is
/// kept raw and passed through unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct GradeEntry {
    pub userid: u64,
    pub grade: Value,
}

// ---------------------------------------------------------------------------
// mod_assign_get_submission_status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionStatusResponse {
    #[serde(default)]
    pub lastattempt: Option<LastAttempt>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LastAttempt {
    #[serde(default)]
    pub submission: Option<SubmissionDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionDetail {
    #[serde(default = "unknown_status")]
    pub status: String,
    #[serde(default)]
    pub timemodified: i64,
    #[serde(default)]
    pub plugins: Vec<SubmissionPlugin>,
}

pub(crate) fn unknown_status() -> String {
    "unknown".to_string()
}

/// Submission content blocks, tagged by the remote `type` field. Plugin
/// kinds the tools do not read collapse into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SubmissionPlugin {
    #[serde(rename = "onlinetext")]
    OnlineText {
        #[serde(default)]
        editorfields: Vec<EditorField>,
    },
    #[serde(rename = "file")]
    File {
        #[serde(default)]
        fileareas: Vec<FileArea>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorField {
    pub name: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileArea {
    pub area: String,
    #[serde(default)]
    pub files: Vec<SubmissionFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub fileurl: String,
    #[serde(default)]
    pub filesize: u64,
    #[serde(default)]
    pub mimetype: String,
}

// ---------------------------------------------------------------------------
// mod_quiz_get_user_best_grade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BestGrade {
    #[serde(default)]
    pub hasgrade: bool,
    #[serde(default)]
    pub grade: Option<Value>,
}
