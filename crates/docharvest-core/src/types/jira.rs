use crate::document::{DocumentCore, Representation};

/// A Jira issue, keyed by its issue key (e.g. `PROJ-123`).
#[derive(Debug, Clone, PartialEq)]
pub struct JiraDocument {
    core: DocumentCore,
}

impl JiraDocument {
    pub fn jira_key(&self) -> String {
        self.core.get_str("key")
    }

    /// Bug, Story, Epic, …
    pub fn issue_type(&self) -> String {
        self.core.get_str("issuetype_name")
    }

    pub fn status(&self) -> String {
        self.core.get_str("status_name")
    }

    pub fn priority(&self) -> String {
        self.core.get_str("priority_name")
    }

    pub fn assignee(&self) -> String {
        self.core.get_str("assignee_name")
    }

    pub fn reporter(&self) -> String {
        self.core.get_str("reporter_name")
    }

    pub fn created_date(&self) -> String {
        self.core.get_str("created")
    }

    pub fn updated_date(&self) -> String {
        self.core.get_str("updated")
    }

    /// Only present once the issue is resolved.
    pub fn resolution_date(&self) -> Option<String> {
        Some(self.core.get_str("resolutiondate")).filter(|s| !s.is_empty())
    }
}

impl Representation for JiraDocument {
    const KIND: &'static str = "JiraDocument";

    fn from_core(core: DocumentCore) -> Self {
        Self { core }
    }

    fn core(&self) -> &DocumentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut DocumentCore {
        &mut self.core
    }

    fn natural_identity(&self) -> Option<String> {
        Some(self.jira_key())
    }

    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Jira Key", self.jira_key()),
            ("Issue Type", self.issue_type()),
            ("Status", self.status()),
            ("Priority", self.priority()),
            ("Assignee", self.assignee()),
            ("Reporter", self.reporter()),
            ("Created Date", self.created_date()),
            ("Updated Date", self.updated_date()),
            ("Resolution Date", self.resolution_date().unwrap_or_default()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    fn issue(metadata: serde_json::Value) -> JiraDocument {
        JiraDocument::from_core(DocumentCore::new(
            "Fix bug",
            metadata.as_object().cloned(),
        ))
    }

    #[test]
    fn test_identity_is_issue_key() {
        let doc = issue(json!({"key": "PROJ-9", "status_name": "Open"}));
        assert_eq!(doc.identity(), "PROJ-9");
        assert_eq!(doc.status(), "Open");
        assert_eq!(doc.kind(), "JiraDocument");
    }

    #[test]
    fn test_missing_fields_default_empty() {
        let doc = issue(json!({}));
        assert_eq!(doc.identity(), "Unknown");
        assert_eq!(doc.priority(), "");
        assert_eq!(doc.assignee(), "");
        assert_eq!(doc.resolution_date(), None);
    }

    #[test]
    fn test_describe_lists_only_present_fields() {
        let doc = issue(json!({
            "key": "PROJ-1",
            "issuetype_name": "Bug",
            "priority_name": "High"
        }));
        let text = doc.describe();
        assert!(text.starts_with("Document Type: JiraDocument\nJira Key: PROJ-1\nIssue Type: Bug\nPriority: High\n"));
        assert!(!text.contains("Assignee:"));
        assert!(text.contains("END: PROJ-1"));
    }
}
