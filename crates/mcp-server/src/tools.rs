//! MCP tools for Moodle LMS
//!
//! Routes tool calls to the Moodle web-service gateway and normalizes the
//! heterogeneous remote shapes into stable text results. Unknown tool names
//! and missing required arguments are protocol errors; remote failures are
//! downgraded to error-flagged tool results so a failing call never takes
//! down the serve loop.

use rmcp::handler::server::tool::{ToolCallContext, ToolRouter};
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorCode, Implementation, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::{schemars, tool, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use moodle_gateway::types::{Assignment, AssignmentsResponse};
use moodle_gateway::{GatewayError, LmsGateway, SaveGradeRequest};

mod catalog;
mod content;
mod submissions;

/// Placeholder grade for submissions and quizzes with no recorded grade.
pub(crate) const NOT_GRADED: &str = "Not graded";

const NO_ASSIGNMENTS: &str = "No assignments found matching the given criteria";

/// Moodle MCP Service
#[derive(Clone)]
pub struct MoodleService {
    gateway: Arc<dyn LmsGateway>,
    course_id: u64,
    tool_router: ToolRouter<Self>,
}

impl MoodleService {
    pub fn new(gateway: Arc<dyn LmsGateway>, course_id: u64) -> Self {
        Self {
            gateway,
            course_id,
            tool_router: Self::tool_router(),
        }
    }
}

impl ServerHandler for MoodleService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(catalog::tool_instructions()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, McpError>> + Send + '_
    {
        async move {
            // Unknown tool names are a protocol failure, not a tool result.
            if !self.tool_router.map.contains_key(request.name.as_ref()) {
                return Err(McpError::new(
                    ErrorCode::METHOD_NOT_FOUND,
                    format!("Unknown tool '{}'", request.name),
                    None,
                ));
            }
            let context = ToolCallContext::new(self, request, context);
            self.tool_router.call(context).await
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListToolsResult, McpError>> + Send + '_
    {
        async move {
            // The router map has no stable iteration order; the catalog fixes it.
            let order: HashMap<&str, usize> = catalog::TOOL_CATALOG
                .iter()
                .enumerate()
                .map(|(position, tool)| (tool.name, position))
                .collect();
            let mut tools = self.tool_router.list_all();
            tools.sort_by_key(|tool| order.get(tool.name.as_ref()).copied().unwrap_or(usize::MAX));
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
            })
        }
    }
}

// ============================================================================
// Tool Input/Output Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSubmissionsRequest {
    /// Restrict results to one student
    #[serde(rename = "studentId")]
    #[schemars(description = "Only include submissions from this student id")]
    pub student_id: Option<u64>,

    /// Restrict results to one assignment
    #[serde(rename = "assignmentId")]
    #[schemars(description = "Only include submissions for this assignment id")]
    pub assignment_id: Option<u64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ProvideFeedbackRequest {
    #[serde(rename = "studentId")]
    #[schemars(description = "Id of the student being graded")]
    pub student_id: u64,

    #[serde(rename = "assignmentId")]
    #[schemars(description = "Id of the assignment being graded")]
    pub assignment_id: u64,

    #[schemars(description = "Feedback text, rendered as HTML for the student")]
    pub feedback: String,

    /// Defaults to 0 when absent
    #[schemars(description = "Numeric grade to record (defaults to 0)")]
    pub grade: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSubmissionContentRequest {
    #[serde(rename = "studentId")]
    #[schemars(description = "Id of the student whose submission to fetch")]
    pub student_id: u64,

    #[serde(rename = "assignmentId")]
    #[schemars(description = "Id of the assignment the submission belongs to")]
    pub assignment_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetQuizGradeRequest {
    #[serde(rename = "studentId")]
    #[schemars(description = "Id of the student whose grade to look up")]
    pub student_id: u64,

    #[serde(rename = "quizId")]
    #[schemars(description = "Id of the quiz")]
    pub quiz_id: u64,
}

#[derive(Debug, Serialize)]
pub struct StudentInfo {
    pub id: u64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGradeView {
    pub has_grade: bool,
    /// The remote grade value when graded, else the literal "Not graded".
    pub grade: Value,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl MoodleService {
    /// List enrolled students
    #[tool(
        description = "List students enrolled in the course with id, username, name, and email."
    )]
    pub async fn get_students(&self) -> Result<CallToolResult, McpError> {
        let users = match self.gateway.enrolled_users(self.course_id).await {
            Ok(users) => users,
            Err(e) => return Ok(error_result(&e)),
        };

        let students: Vec<StudentInfo> = users
            .into_iter()
            .filter(|user| user.is_student())
            .map(|user| StudentInfo {
                id: user.id,
                username: user.username,
                firstname: user.firstname,
                lastname: user.lastname,
                email: user.email,
            })
            .collect();

        Ok(json_result(&students))
    }

    /// List course assignments
    #[tool(description = "List the assignments of the course, as reported by Moodle.")]
    pub async fn get_assignments(&self) -> Result<CallToolResult, McpError> {
        let response = match self.gateway.assignments(self.course_id).await {
            Ok(response) => response,
            Err(e) => return Ok(error_result(&e)),
        };
        Ok(json_result(&course_assignments(response, self.course_id)))
    }

    /// List course quizzes
    #[tool(description = "List the quizzes of the course, as reported by Moodle.")]
    pub async fn get_quizzes(&self) -> Result<CallToolResult, McpError> {
        match self.gateway.quizzes(self.course_id).await {
            Ok(response) => Ok(json_result(&response.quizzes)),
            Err(e) => Ok(error_result(&e)),
        }
    }

    /// Submissions joined with grades
    #[tool(
        description = "Assignment submissions joined with their grades, optionally narrowed to one student and/or one assignment. Ungraded submissions report the grade 'Not graded'."
    )]
    pub async fn get_submissions(
        &self,
        Parameters(request): Parameters<GetSubmissionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let response = match self.gateway.assignments(self.course_id).await {
            Ok(response) => response,
            Err(e) => return Ok(error_result(&e)),
        };

        let all = course_assignments(response, self.course_id);
        let selected: Vec<Assignment> = match request.assignment_id {
            Some(id) => all.into_iter().filter(|a| a.id == id).collect(),
            None => all,
        };
        if selected.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(NO_ASSIGNMENTS)]));
        }

        match submissions::collect(self.gateway.as_ref(), &selected, request.student_id).await {
            Ok(views) => Ok(json_result(&views)),
            Err(e) => Ok(error_result(&e)),
        }
    }

    /// Grade a submission and leave feedback
    #[tool(
        description = "Record a grade and feedback for a student's assignment submission. The feedback is released to the student immediately."
    )]
    pub async fn provide_feedback(
        &self,
        Parameters(request): Parameters<ProvideFeedbackRequest>,
    ) -> Result<CallToolResult, McpError> {
        let grade = request.grade.unwrap_or(0.0);
        let save = SaveGradeRequest {
            assignment_id: request.assignment_id,
            user_id: request.student_id,
            grade,
            feedback: request.feedback,
        };

        match self.gateway.save_grade(save).await {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "Feedback saved for student {} on assignment {} (grade {grade})",
                request.student_id, request.assignment_id
            ))])),
            Err(e) => Ok(error_result(&e)),
        }
    }

    /// Submitted text and files
    #[tool(
        description = "Online text and file attachments of one student's assignment submission."
    )]
    pub async fn get_submission_content(
        &self,
        Parameters(request): Parameters<GetSubmissionContentRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self
            .gateway
            .submission_status(request.assignment_id, request.student_id)
            .await
        {
            Ok(response) => Ok(json_result(&content::normalize(response))),
            Err(e) => Ok(error_result(&e)),
        }
    }

    /// Best quiz grade
    #[tool(
        description = "Best grade a student achieved on a quiz. Reports 'Not graded' when no grade is recorded."
    )]
    pub async fn get_quiz_grade(
        &self,
        Parameters(request): Parameters<GetQuizGradeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let best = match self
            .gateway
            .best_grade(request.quiz_id, request.student_id)
            .await
        {
            Ok(best) => best,
            Err(e) => return Ok(error_result(&e)),
        };

        let view = QuizGradeView {
            has_grade: best.hasgrade,
            grade: match (best.hasgrade, best.grade) {
                (true, Some(grade)) => grade,
                _ => Value::String(NOT_GRADED.to_string()),
            },
        };
        Ok(json_result(&view))
    }
}

/// The remote groups assignments by course; pick the configured one.
fn course_assignments(response: AssignmentsResponse, course_id: u64) -> Vec<Assignment> {
    response
        .courses
        .into_iter()
        .find(|course| course.id == course_id)
        .map(|course| course.assignments)
        .unwrap_or_default()
}

fn json_result<T: Serialize>(payload: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(payload).unwrap_or_default(),
    )])
}

fn error_result(err: &GatewayError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("Error: {err}"))])
}
