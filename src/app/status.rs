#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_unhandled(&mut self) {
        self.message = "Not saved: no save handler installed".to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn saved(&mut self, valid: bool) {
        self.message = if valid {
            "Saved".to_string()
        } else {
            "Saved with validation issues".to_string()
        };
    }

    pub fn cleared(&mut self) {
        self.message = "Form cleared".to_string();
    }

    pub fn loaded(&mut self, identity: &str) {
        self.message = if identity.is_empty() {
            "Record loaded".to_string()
        } else {
            format!("Loaded {identity}")
        };
    }

    pub fn discard_declined(&mut self) {
        self.message = "Unsaved changes kept".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
