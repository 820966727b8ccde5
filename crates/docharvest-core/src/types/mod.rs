//! Source-specific document representations.
//!
//! | Store name | Representation | Identity |
//! |------------|----------------|----------|
//! | `jira_issues` | [`JiraDocument`] | issue key |
//! | `email_messages` | [`EmailDocument`] | `message-id` |
//! | `slack_messages` | [`SlackMessageDocument`] | `<channel>_<ts>` |
//! | `slab_documents` | [`SlabDocument`] | `document_id` |
//! | `slab_document_chunks` | [`SlabChunkDocument`] | generated UUID |
//! | `bitbucket_pull_requests` | [`BitbucketPullRequest`] | PR id |
//! | `google_calendar_events` | [`CalendarDocument`] | `event_id` |
//!
//! All typed accessors read from the attribute bag and return an empty
//! string when the backing attribute is absent.

mod bitbucket;
mod calendar;
mod email;
mod jira;
mod slab;
mod slack;

pub use bitbucket::BitbucketPullRequest;
pub use calendar::CalendarDocument;
pub use email::EmailDocument;
pub use jira::JiraDocument;
pub use slab::{SlabChunkDocument, SlabDocument, SlabFields};
pub use slack::SlackMessageDocument;
