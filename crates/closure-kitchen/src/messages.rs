// ABOUTME: Localized messages the controller surfaces to the user

use kitchen_types::Locale;

/// Message catalog for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    locale: Locale,
}

impl Messages {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Prompt shown before discarding a modified project
    pub fn confirm_discard(&self) -> &'static str {
        match self.locale {
            Locale::En => "The curent project is modified.\nDiscard anyway?",
            Locale::Ja => "プロジェクトの変更を破棄しますか？",
        }
    }

    pub fn failed_to_load(&self, name: &str) -> String {
        match self.locale {
            Locale::En => format!("Failed to load \"{name}\""),
            Locale::Ja => format!("\"{name}\"の読み込みに失敗しました。"),
        }
    }

    pub fn new_project(&self) -> &'static str {
        match self.locale {
            Locale::En => "New project",
            Locale::Ja => "新規プロジェクト",
        }
    }
}
