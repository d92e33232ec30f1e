#[cfg(test)]
#[path = "source_test.rs"]
mod tests;

use std::fmt;

use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Characters left untouched by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// A retrieved passage backing an answer. `score` is a distance, lower is
/// more relevant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub content: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: SourceMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchQuality {
    Excellent,
    Good,
    Fair,
}

impl MatchQuality {
    pub fn from_distance(score: f64) -> MatchQuality {
        if score < 0.3 {
            return MatchQuality::Excellent;
        }
        if score < 0.5 {
            return MatchQuality::Good;
        }

        return MatchQuality::Fair;
    }
}

impl fmt::Display for MatchQuality {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchQuality::Excellent => return write!(f, "Excellent match"),
            MatchQuality::Good => return write!(f, "Good match"),
            MatchQuality::Fair => return write!(f, "Fair match"),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    return value.as_deref().filter(|e| return !e.is_empty());
}

/// Resolves a backend provided PDF link. Absolute URLs are kept, anything else
/// is treated as a path on the backend.
pub fn pdf_url(base_url: &str, pdf_url: Option<&str>) -> Option<String> {
    let url = pdf_url.filter(|e| return !e.is_empty())?;
    if url.starts_with("http") {
        return Some(url.to_string());
    }

    return Some(format!("{base_url}{url}"));
}

impl Source {
    /// Link to open the cited document, if one can be derived.
    pub fn link(&self, base_url: &str) -> Option<String> {
        if let Some(url) = pdf_url(base_url, non_empty(&self.pdf_url)) {
            return Some(url);
        }

        let path = non_empty(&self.metadata.source)?;
        let normalized = path.replace('\\', "/");
        let encoded = utf8_percent_encode(&normalized, URI_COMPONENT).to_string();

        return Some(format!("{base_url}/api/pdf?file={encoded}"));
    }

    /// `index` is zero based, placeholders are shown one based.
    pub fn display_name(&self, index: usize) -> String {
        if let Some(filename) = non_empty(&self.filename) {
            return filename.to_string();
        }

        if let Some(path) = non_empty(&self.metadata.source) {
            let last = path.split('/').last().unwrap_or_default();
            return last.split('\\').last().unwrap_or_default().to_string();
        }

        return format!("Source {}", index + 1);
    }

    pub fn page_label(&self) -> Option<String> {
        return self
            .metadata
            .page
            .map(|page| return format!("Page {}", page + 1));
    }

    pub fn label(&self, index: usize) -> String {
        let name = self.display_name(index);
        if let Some(page) = self.page_label() {
            return format!("{name} - {page}");
        }

        return name;
    }

    pub fn match_quality(&self) -> MatchQuality {
        return MatchQuality::from_distance(self.score);
    }
}
