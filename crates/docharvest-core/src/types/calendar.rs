use crate::document::{DocumentCore, Representation};

/// A Google Calendar event, keyed by its event id.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDocument {
    core: DocumentCore,
}

impl CalendarDocument {
    pub fn event_id(&self) -> String {
        self.core.get_str("event_id")
    }

    pub fn summary(&self) -> String {
        self.core.get_str("summary")
    }

    pub fn description(&self) -> String {
        self.core.get_str("description")
    }

    pub fn location(&self) -> String {
        self.core.get_str("location")
    }

    pub fn organizer(&self) -> String {
        self.core.get_str("organizer")
    }

    pub fn attendees(&self) -> String {
        self.core.get_str("attendees")
    }

    pub fn start_time(&self) -> String {
        self.core.get_str("start")
    }

    pub fn end_time(&self) -> String {
        self.core.get_str("end")
    }

    pub fn status(&self) -> String {
        self.core.get_str("status")
    }

    pub fn event_type(&self) -> String {
        self.core.get_str("eventType")
    }
}

impl Representation for CalendarDocument {
    const KIND: &'static str = "CalendarDocument";

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
        Some(self.event_id())
    }

    fn labeled_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Event ID", self.event_id()),
            ("Summary", self.summary()),
            ("Description", self.description()),
            ("Location", self.location()),
            ("Organizer", self.organizer()),
            ("Attendees", self.attendees()),
            ("Start", self.start_time()),
            ("End", self.end_time()),
            ("Status", self.status()),
            ("Type", self.event_type()),
        ]
    }
}
