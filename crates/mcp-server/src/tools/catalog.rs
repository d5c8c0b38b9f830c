#[derive(Clone, Copy, Debug)]
pub(crate) struct ToolDescriptor {
    pub(crate) name: &'static str,
    pub(crate) summary: &'static str,
}

/// The fixed tool catalog, in the order `tools/list` reports it.
pub(crate) const TOOL_CATALOG: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "get_students",
        summary: "List students enrolled in the course.",
    },
    ToolDescriptor {
        name: "get_assignments",
        summary: "List the course assignments.",
    },
    ToolDescriptor {
        name: "get_quizzes",
        summary: "List the course quizzes.",
    },
    ToolDescriptor {
        name: "get_submissions",
        summary: "Assignment submissions joined with grades (optionally filtered).",
    },
    ToolDescriptor {
        name: "provide_feedback",
        summary: "Grade a submission and leave feedback visible to the student.",
    },
    ToolDescriptor {
        name: "get_submission_content",
        summary: "Online text and file attachments of one submission.",
    },
    ToolDescriptor {
        name: "get_quiz_grade",
        summary: "Best quiz grade for one student.",
    },
];

pub(crate) fn tool_instructions() -> String {
    let mut lines = vec![
        "Moodle MCP exposes course operations for one configured course.".to_string(),
        "Reads never mutate remote state; provide_feedback is the only write.".to_string(),
        "Tools:".to_string(),
    ];
    for tool in TOOL_CATALOG {
        lines.push(format!("- {}: {}", tool.name, tool.summary));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let mut names: Vec<&str> = TOOL_CATALOG.iter().map(|t| t.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TOOL_CATALOG.len());
    }

    #[test]
    fn instructions_mention_every_tool() {
        let instructions = tool_instructions();
        for tool in TOOL_CATALOG {
            assert!(instructions.contains(tool.name));
        }
    }
}
