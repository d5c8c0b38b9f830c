//! Normalization for the `get_submission_content` tool.
//!
//! The remote submission-status payload nests content under per-type
//! plugins. The normalized shape always carries exactly two plugin entries,
//! "onlinetext" and "file", whether or not the remote sent either.

use serde::Serialize;

use moodle_gateway::types::{SubmissionPlugin, SubmissionStatusResponse};

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionContent {
    pub status: String,
    pub timemodified: i64,
    pub plugins: Vec<PluginContent>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum PluginContent {
    #[serde(rename = "onlinetext")]
    OnlineText { content: String },
    #[serde(rename = "file")]
    File { files: Vec<FileInfo> },
}

#[derive(Debug, Serialize)]
pub(crate) struct FileInfo {
    pub filename: String,
    pub url: String,
    pub size: u64,
    pub mimetype: String,
}

pub(crate) fn normalize(response: SubmissionStatusResponse) -> SubmissionContent {
    let submission = response.lastattempt.and_then(|attempt| attempt.submission);
    let (status, timemodified, plugins) = match submission {
        Some(s) => (s.status, s.timemodified, s.plugins),
        None => ("unknown".to_string(), 0, Vec::new()),
    };

    let mut text: Option<String> = None;
    let mut files = Vec::new();
    for plugin in plugins {
        match plugin {
            SubmissionPlugin::OnlineText { editorfields } => {
                if text.is_none() {
                    text = editorfields
                        .iter()
                        .find(|field| field.name == "onlinetext")
                        .map(|field| field.text.clone());
                }
            }
            SubmissionPlugin::File { fileareas } => {
                for area in fileareas
                    .into_iter()
                    .filter(|area| area.area == "submission_files")
                {
                    files.extend(area.files.into_iter().map(|f| FileInfo {
                        filename: f.filename,
                        url: f.fileurl,
                        size: f.filesize,
                        mimetype: f.mimetype,
                    }));
                }
            }
            SubmissionPlugin::Other => {}
        }
    }

    SubmissionContent {
        status,
        timemodified,
        plugins: vec![
            PluginContent::OnlineText {
                content: text.unwrap_or_default(),
            },
            PluginContent::File { files },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn status(raw: serde_json::Value) -> SubmissionStatusResponse {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn extracts_text_and_files() {
        let content = normalize(status(json!({"lastattempt": {"submission": {
            "status": "submitted",
            "timemodified": 1700000000,
            "plugins": [
                {"type": "comments"},
                {"type": "onlinetext", "editorfields": [
                    {"name": "somethingelse", "text": "ignored"},
                    {"name": "onlinetext", "text": "<p>my answer</p>"},
                ]},
                {"type": "file", "fileareas": [
                    {"area": "other_area", "files": [{"filename": "skip.txt"}]},
                    {"area": "submission_files", "files": [{
                        "filename": "essay.pdf",
                        "fileurl": "https://moodle.example.edu/f/essay.pdf",
                        "filesize": 2048,
                        "mimetype": "application/pdf",
                    }]},
                ]},
            ],
        }}})));

        assert_eq!(content.status, "submitted");
        assert_eq!(content.timemodified, 1700000000);
        assert_eq!(content.plugins.len(), 2);
        assert!(matches!(&content.plugins[0], PluginContent::OnlineText { content }
            if content == "<p>my answer</p>"));
        match &content.plugins[1] {
            PluginContent::File { files } => {
                assert_eq!(files.len(), 1);
                assert_eq!(files[0].filename, "essay.pdf");
                assert_eq!(files[0].url, "https://moodle.example.edu/f/essay.pdf");
                assert_eq!(files[0].size, 2048);
                assert_eq!(files[0].mimetype, "application/pdf");
            }
            other => panic!("expected file plugin, got {other:?}"),
        }
    }

    #[test]
    fn always_emits_both_plugin_kinds() {
        // Remote sent only plugin types we do not surface.
        let content = normalize(status(json!({"lastattempt": {"submission": {
            "status": "submitted",
            "timemodified": 5,
            "plugins": [{"type": "comments"}],
        }}})));

        assert_eq!(content.plugins.len(), 2);
        assert!(matches!(&content.plugins[0], PluginContent::OnlineText { content }
            if content.is_empty()));
        assert!(
            matches!(&content.plugins[1], PluginContent::File { files } if files.is_empty())
        );
    }

    #[test]
    fn missing_submission_defaults_status_and_time() {
        for raw in [json!({}), json!({"lastattempt": {}})] {
            let content = normalize(status(raw));
            assert_eq!(content.status, "unknown");
            assert_eq!(content.timemodified, 0);
            assert_eq!(content.plugins.len(), 2);
        }
    }

    #[test]
    fn serialized_shape_tags_plugins_by_type() {
        let content = normalize(status(json!({"lastattempt": {"submission": {
            "status": "submitted",
            "timemodified": 1,
            "plugins": [],
        }}})));
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["plugins"][0]["type"], "onlinetext");
        assert_eq!(value["plugins"][1]["type"], "file");
    }
}
