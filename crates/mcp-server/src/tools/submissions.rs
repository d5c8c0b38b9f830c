//! Fan-out and join for the `get_submissions` tool.
//!
//! For every selected assignment the submission list and the grade list are
//! fetched concurrently; all assignments fan out at once. Each submission is
//! then joined to the grade sharing its `userid`. Assignment order follows
//! the source assignment list, submission order follows the remote response.

use futures::future;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use moodle_gateway::types::{Assignment, GradesResponse, SubmissionsResponse};
use moodle_gateway::{LmsGateway, Result};

use super::NOT_GRADED;

#[derive(Debug, Serialize)]
pub(crate) struct AssignmentSubmissionsView {
    pub assignmentid: u64,
    pub assignmentname: String,
    pub submissions: Vec<SubmissionView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionView {
    pub userid: u64,
    pub status: String,
    /// The remote grade value, or the literal "Not graded".
    pub grade: Value,
    /// ISO-8601 rendering of the submission's modification time.
    pub timemodified: String,
}

pub(crate) async fn collect(
    gateway: &dyn LmsGateway,
    assignments: &[Assignment],
    student_id: Option<u64>,
) -> Result<Vec<AssignmentSubmissionsView>> {
    let fetches = assignments.iter().map(|assignment| async move {
        tokio::try_join!(
            gateway.submissions(assignment.id),
            gateway.grades(assignment.id)
        )
    });
    let fetched = future::try_join_all(fetches).await?;

    Ok(assignments
        .iter()
        .zip(fetched)
        .map(|(assignment, (submissions, grades))| {
            join_assignment(assignment, submissions, grades, student_id)
        })
        .collect())
}

fn join_assignment(
    assignment: &Assignment,
    submissions: SubmissionsResponse,
    grades: GradesResponse,
    student_id: Option<u64>,
) -> AssignmentSubmissionsView {
    let grade_by_user: HashMap<u64, Value> = grades
        .assignments
        .into_iter()
        .flat_map(|a| a.grades)
        .map(|g| (g.userid, g.grade))
        .collect();

    let submissions = submissions
        .assignments
        .into_iter()
        .flat_map(|a| a.submissions)
        .filter(|s| student_id.map_or(true, |id| s.userid == id))
        .map(|s| SubmissionView {
            grade: grade_by_user
                .get(&s.userid)
                .cloned()
                .unwrap_or_else(|| Value::String(NOT_GRADED.to_string())),
            userid: s.userid,
            status: s.status,
            timemodified: iso8601(s.timemodified),
        })
        .collect();

    AssignmentSubmissionsView {
        assignmentid: assignment.id,
        assignmentname: assignment.name.clone(),
        submissions,
    }
}

fn iso8601(epoch_seconds: i64) -> String {
    chrono::DateTime::from_timestamp(epoch_seconds, 0)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
        .unwrap_or_default()
}
