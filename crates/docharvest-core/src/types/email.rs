use crate::document::{DocumentCore, Representation};

/// An email message, keyed by its `Message-ID` header.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailDocument {
    core: DocumentCore,
}

impl EmailDocument {
    pub fn message_id(&self) -> String {
        self.core.get_str("message-id")
    }

    pub fn sender(&self) -> String {
        self.core.get_str("from")
    }

    pub fn recipients(&self) -> String {
        self.core.get_str("to")
    }

    pub fn cc(&self) -> String {
        self.core.get_str("cc")
    }

    pub fn bcc(&self) -> String {
        self.core.get_str("bcc")
    }

    pub fn subject(&self) -> String {
        self.core.get_str("subject")
    }

    pub fn date(&self) -> String {
        self.core.get_str("date")
    }
}

impl Representation for EmailDocument {
    const KIND: &'static str = "EmailDocument";

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
        Some(self.message_id())
    }

    // BCC is not rendered.
    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Message ID", self.message_id()),
            ("From", self.sender()),
            ("To", self.recipients()),
            ("CC", self.cc()),
            ("Subject", self.subject()),
            ("Date", self.date()),
        ]
    }
}
