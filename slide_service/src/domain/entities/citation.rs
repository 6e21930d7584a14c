use serde::{Deserialize, Serialize};

/// A source backing generated content
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Citation {
    pub source: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl Citation {
    /// One reference line: `source - title (date)`, absent parts left out
    pub fn reference_line(&self) -> String {
        let mut line = self.source.clone();
        if let Some(title) = &self.title {
            line.push_str(" - ");
            line.push_str(title);
        }
        if let Some(date) = &self.date {
            line.push_str(&format!(" ({})", date));
        }
        line
    }
}
