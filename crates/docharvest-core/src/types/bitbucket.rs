use crate::document::{DocumentCore, Representation};

/// A Bitbucket pull request, keyed by its numeric PR id.
#[derive(Debug, Clone, PartialEq)]
pub struct BitbucketPullRequest {
    core: DocumentCore,
}

impl BitbucketPullRequest {
    pub fn pr_id(&self) -> String {
        self.core.get_str("id")
    }

    /// Repository slug.
    pub fn repository(&self) -> String {
        self.core.get_str("repo_slug")
    }

    pub fn title(&self) -> String {
        self.core.get_str("title")
    }

    pub fn author(&self) -> String {
        self.core.get_str("author_name")
    }

    pub fn participants(&self) -> String {
        self.core.get_str("all_participants")
    }

    pub fn source_branch(&self) -> String {
        self.core.get_str("source_branch")
    }

    pub fn destination_branch(&self) -> String {
        self.core.get_str("destination_branch")
    }

    pub fn state(&self) -> String {
        self.core.get_str("state")
    }

    pub fn created_date(&self) -> String {
        self.core.get_str("created_on")
    }

    pub fn updated_date(&self) -> String {
        self.core.get_str("updated_on")
    }
}

impl Representation for BitbucketPullRequest {
    const KIND: &'static str = "BitbucketPullRequest";

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
        Some(self.pr_id())
    }

    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("PR ID", self.pr_id()),
            ("Repository", self.repository()),
            ("Title", self.title()),
            ("Author", self.author()),
            ("Participants", self.participants()),
            ("Source Branch", self.source_branch()),
            ("Destination Branch", self.destination_branch()),
            ("State", self.state()),
            ("Created", self.created_date()),
            ("Updated", self.updated_date()),
        ]
    }
}
