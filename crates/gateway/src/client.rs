//! The `LmsGateway` seam and its reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::error::{GatewayError, Result};
use crate::types::{
    AssignmentsResponse, BestGrade, EnrolledUser, GradesResponse, QuizzesResponse,
    SubmissionStatusResponse, SubmissionsResponse,
};

const REST_ENDPOINT: &str = "/webservice/rest/server.php";

/// Moodle text format selector for rich-text (HTML) content.
const FORMAT_HTML: u8 = 1;

/// Arguments for the grade-saving operation. Policy fields (latest attempt,
/// released workflow state, no new attempt, single student) are fixed by the
/// gateway, not chosen by callers.
#[derive(Debug, Clone)]
pub struct SaveGradeRequest {
    pub assignment_id: u64,
    pub user_id: u64,
    pub grade: f64,
    pub feedback: String,
}

/// One method per remote `wsfunction`. Tool handlers depend on this trait so
/// tests can substitute a deterministic fake.
#[async_trait]
pub trait LmsGateway: Send + Sync {
    async fn enrolled_users(&self, course_id: u64) -> Result<Vec<EnrolledUser>>;
    async fn assignments(&self, course_id: u64) -> Result<AssignmentsResponse>;
    async fn quizzes(&self, course_id: u64) -> Result<QuizzesResponse>;
    async fn submissions(&self, assignment_id: u64) -> Result<SubmissionsResponse>;
    async fn grades(&self, assignment_id: u64) -> Result<GradesResponse>;
    async fn save_grade(&self, request: SaveGradeRequest) -> Result<()>;
    async fn submission_status(
        &self,
        assignment_id: u64,
        user_id: u64,
    ) -> Result<SubmissionStatusResponse>;
    async fn best_grade(&self, quiz_id: u64, user_id: u64) -> Result<BestGrade>;
}

/// Reqwest-backed gateway. One shared client, no retries, no timeout beyond
/// the client default.
pub struct HttpGateway {
    client: Client,
    endpoint: String,
    token: String,
}

impl HttpGateway {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: format!("{}{}", config.api_url.trim_end_matches('/'), REST_ENDPOINT),
            token: config.token.clone(),
        })
    }

    /// Issue one web-service call and return the raw JSON body, converting
    /// transport failures, non-2xx statuses, and Moodle exception bodies
    /// (which arrive with HTTP 200) into `GatewayError`.
    async fn rest(&self, wsfunction: &str, params: Vec<(String, String)>) -> Result<Value> {
        let form = build_form(&self.token, wsfunction, params);

        log::debug!("calling {wsfunction}");
        let response = self.client.post(&self.endpoint).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = remote_message(&body)
                .unwrap_or_else(|| format!("{wsfunction} failed with HTTP {status}"));
            return Err(GatewayError::remote(message));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value =
            serde_json::from_str(&body).map_err(|e| GatewayError::decode(wsfunction, e))?;
        if let Some(message) = moodle_exception(&value) {
            return Err(GatewayError::remote(message));
        }
        Ok(value)
    }

    async fn rest_typed<T: DeserializeOwned>(
        &self,
        wsfunction: &str,
        params: Vec<(String, String)>,
    ) -> Result<T> {
        let value = self.rest(wsfunction, params).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::decode(wsfunction, e))
    }
}

#[async_trait]
impl LmsGateway for HttpGateway {
    async fn enrolled_users(&self, course_id: u64) -> Result<Vec<EnrolledUser>> {
        self.rest_typed(
            "core_enrol_get_enrolled_users",
            vec![("courseid".to_string(), course_id.to_string())],
        )
        .await
    }

    async fn assignments(&self, course_id: u64) -> Result<AssignmentsResponse> {
        self.rest_typed(
            "mod_assign_get_assignments",
            vec![("courseids[0]".to_string(), course_id.to_string())],
        )
        .await
    }

    async fn quizzes(&self, course_id: u64) -> Result<QuizzesResponse> {
        self.rest_typed(
            "mod_quiz_get_quizzes_by_courses",
            vec![("courseids[0]".to_string(), course_id.to_string())],
        )
        .await
    }

    async fn submissions(&self, assignment_id: u64) -> Result<SubmissionsResponse> {
        self.rest_typed(
            "mod_assign_get_submissions",
            vec![("assignmentids[0]".to_string(), assignment_id.to_string())],
        )
        .await
    }

    async fn grades(&self, assignment_id: u64) -> Result<GradesResponse> {
        self.rest_typed(
            "mod_assign_get_grades",
            vec![("assignmentids[0]".to_string(), assignment_id.to_string())],
        )
        .await
    }

    async fn save_grade(&self, request: SaveGradeRequest) -> Result<()> {
        // The response body is not meaningful for this operation.
        self.rest("mod_assign_save_grade", save_grade_params(&request))
            .await?;
        Ok(())
    }

    async fn submission_status(
        &self,
        assignment_id: u64,
        user_id: u64,
    ) -> Result<SubmissionStatusResponse> {
        self.rest_typed(
            "mod_assign_get_submission_status",
            vec![
                ("assignid".to_string(), assignment_id.to_string()),
                ("userid".to_string(), user_id.to_string()),
            ],
        )
        .await
    }

    async fn best_grade(&self, quiz_id: u64, user_id: u64) -> Result<BestGrade> {
        self.rest_typed(
            "mod_quiz_get_user_best_grade",
            vec![
                ("quizid".to_string(), quiz_id.to_string()),
                ("userid".to_string(), user_id.to_string()),
            ],
        )
        .await
    }
}

fn build_form(
    token: &str,
    wsfunction: &str,
    params: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut form = vec![
        ("wstoken".to_string(), token.to_string()),
        ("moodlewsrestformat".to_string(), "json".to_string()),
        ("wsfunction".to_string(), wsfunction.to_string()),
    ];
    form.extend(params);
    form
}

/// Fixed grading policy: grade the latest attempt, never open a new one,
/// release the result to the student, apply to this student only, and submit
/// the feedback as HTML editor content.
fn save_grade_params(request: &SaveGradeRequest) -> Vec<(String, String)> {
    vec![
        (
            "assignmentid".to_string(),
            request.assignment_id.to_string(),
        ),
        ("userid".to_string(), request.user_id.to_string()),
        ("grade".to_string(), request.grade.to_string()),
        ("attemptnumber".to_string(), "-1".to_string()),
        ("addattempt".to_string(), "0".to_string()),
        ("workflowstate".to_string(), "released".to_string()),
        ("applytoall".to_string(), "0".to_string()),
        (
            "plugindata[assignfeedbackcomments_editor][text]".to_string(),
            request.feedback.clone(),
        ),
        (
            "plugindata[assignfeedbackcomments_editor][format]".to_string(),
            FORMAT_HTML.to_string(),
        ),
    ]
}

/// Moodle reports web-service failures as a JSON object with an `exception`
/// key, usually alongside `errorcode` and `message`, and often with HTTP 200.
fn moodle_exception(value: &Value) -> Option<String> {
    let object = value.as_object()?;
    if !object.contains_key("exception") {
        return None;
    }
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| object.get("errorcode").and_then(Value::as_str))
        .unwrap_or("Moodle web service error");
    Some(message.to_string())
}

/// Best-effort extraction of the `message` field from an error body.
fn remote_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}
