//! Account profile editing.

use crate::session::User;
use serde::{Deserialize, Serialize};

/// Contact details shown on the account page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Profile {
    /// Profile for a user, with the placeholder contact details the mock
    /// account ships with.
    pub fn for_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: "+1 (555) 123-4567".to_string(),
            address: "123 Main St, City, State 12345".to_string(),
        }
    }
}

/// Edit/cancel/save state for the profile form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEditor {
    saved: Profile,
    draft: Profile,
    editing: bool,
}

impl ProfileEditor {
    pub fn new(profile: Profile) -> Self {
        Self {
            draft: profile.clone(),
            saved: profile,
            editing: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// The values currently displayed.
    pub fn profile(&self) -> &Profile {
        if self.editing {
            &self.draft
        } else {
            &self.saved
        }
    }

    pub fn begin_edit(&mut self) {
        self.draft = self.saved.clone();
        self.editing = true;
    }

    /// Mutable access to the form while editing.
    pub fn draft_mut(&mut self) -> Option<&mut Profile> {
        self.editing.then_some(&mut self.draft)
    }

    /// Keep the edited values and leave edit mode.
    pub fn save(&mut self) {
        if self.editing {
            self.saved = self.draft.clone();
            self.editing = false;
        }
    }

    /// Discard the edits and leave edit mode.
    pub fn cancel(&mut self) {
        self.draft = self.saved.clone();
        self.editing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;

    fn editor() -> ProfileEditor {
        let user = User {
            id: UserId::new("1"),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            avatar: None,
        };
        ProfileEditor::new(Profile::for_user(&user))
    }

    #[test]
    fn test_draft_only_while_editing() {
        let mut editor = editor();
        assert!(editor.draft_mut().is_none());
        editor.begin_edit();
        assert!(editor.draft_mut().is_some());
    }

    #[test]
    fn test_cancel_restores_values() {
        let mut editor = editor();
        editor.begin_edit();
        if let Some(draft) = editor.draft_mut() {
            draft.phone = "000".to_string();
        }
        assert_eq!(editor.profile().phone, "000");

        editor.cancel();
        assert!(!editor.is_editing());
        assert_eq!(editor.profile().phone, "+1 (555) 123-4567");
    }

    #[test]
    fn test_save_keeps_values() {
        let mut editor = editor();
        editor.begin_edit();
        if let Some(draft) = editor.draft_mut() {
            draft.name = "Jane Doe".to_string();
        }
        editor.save();
        assert!(!editor.is_editing());
        assert_eq!(editor.profile().name, "Jane Doe");
    }
}
