//! Whether the creation form is shown

#[derive(Debug, Default)]
pub struct VisibilityStore {
    form_visible: bool,
}

impl VisibilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.form_visible = !self.form_visible;
    }

    pub fn hide(&mut self) {
        self.form_visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.form_visible
    }
}
