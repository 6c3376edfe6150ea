//! API key settings screen

#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    /// Edit buffer; loaded from the credential store when the screen opens
    pub api_key: String,
    pub loading: bool,
    pub saving: bool,
    /// Whether a key is currently stored
    pub has_stored_key: bool,
    pub reveal: bool,
}

impl SettingsState {
    /// Buffer as shown on screen
    pub fn display_key(&self) -> String {
        if self.reveal {
            self.api_key.clone()
        } else {
            "•".repeat(self.api_key.chars().count())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_masked_unless_revealed() {
        let mut state = SettingsState {
            api_key: "sk-abc".into(),
            ..Default::default()
        };
        assert_eq!(state.display_key(), "••••••");
        state.reveal = true;
        assert_eq!(state.display_key(), "sk-abc");
    }
}
