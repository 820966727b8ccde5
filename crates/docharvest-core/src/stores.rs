//! Store-name vocabulary.
//!
//! Each source exporter writes into one named store (an index in the
//! text-search and vector backends). The registry keys representations on
//! these names; adding a source means registering a new name, not
//! changing the registry.

pub const EMAIL_MESSAGES: &str = "email_messages";
pub const JIRA_ISSUES: &str = "jira_issues";
pub const SLAB_DOCUMENT_CHUNKS: &str = "slab_document_chunks";
pub const SLAB_DOCUMENTS: &str = "slab_documents";
pub const SLACK_MESSAGES: &str = "slack_messages";
pub const BITBUCKET_PULL_REQUESTS: &str = "bitbucket_pull_requests";
pub const GOOGLE_CALENDAR_EVENTS: &str = "google_calendar_events";

/// A known store name and what it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreDescriptor {
    pub name: &'static str,
    pub description: &'static str,
}

pub const ALL_STORES: &[StoreDescriptor] = &[
    StoreDescriptor {
        name: EMAIL_MESSAGES,
        description: "Email messages exported from Gmail mail folders.",
    },
    StoreDescriptor {
        name: JIRA_ISSUES,
        description: "Jira issues: tasks, bugs, epics, and features being tracked.",
    },
    StoreDescriptor {
        name: SLAB_DOCUMENT_CHUNKS,
        description: "Paragraph-sized chunks of Slab knowledge-base pages for retrieval.",
    },
    StoreDescriptor {
        name: SLAB_DOCUMENTS,
        description: "Complete Slab pages: guidelines, tech specs, and internal documentation.",
    },
    StoreDescriptor {
        name: SLACK_MESSAGES,
        description: "Slack messages exchanged across channels and threads.",
    },
    StoreDescriptor {
        name: BITBUCKET_PULL_REQUESTS,
        description: "Bitbucket pull requests with their comments and authors.",
    },
    StoreDescriptor {
        name: GOOGLE_CALENDAR_EVENTS,
        description: "Google Calendar events with attendees and schedule.",
    },
];

/// Look up the descriptor for a store name.
pub fn describe_store(name: &str) -> Option<&'static StoreDescriptor> {
    ALL_STORES.iter().find(|s| s.name == name)
}
