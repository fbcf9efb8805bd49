use serde::Deserialize;

/// A forum post as returned by `content.get`.
///
/// Piazza versions every edit, so the current subject and body live in the
/// first entry of `history`. Follow-ups (answers, discussions) are nested
/// under `children`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub history: Vec<Revision>,
    #[serde(default)]
    pub children: Vec<FollowUp>,
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub status: String,
}

/// One revision of a post's subject and content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Revision {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

/// A child entry of a post: instructor answer, student answer or followup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FollowUp {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub history: Vec<Revision>,
    #[serde(default)]
    pub is_tag_endorse: bool,
}

impl Post {
    /// Subject of the latest revision.
    pub fn title(&self) -> &str {
        self.history.first().map(|r| r.subject.as_str()).unwrap_or("")
    }

    /// Body of the latest revision.
    pub fn content(&self) -> &str {
        self.history.first().map(|r| r.content.as_str()).unwrap_or("")
    }

    /// Content of the first instructor answer, if any.
    pub fn instructor_answer(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|c| c.kind == "i_answer")
            .and_then(FollowUp::latest_content)
    }

    /// Content of the first instructor-endorsed student answer, if any.
    pub fn endorsed_student_answer(&self) -> Option<&str> {
        self.children
            .iter()
            .find(|c| c.kind == "s_answer" && c.is_tag_endorse)
            .and_then(FollowUp::latest_content)
    }

    pub fn is_private(&self) -> bool {
        self.status == "private"
    }

    pub fn in_folder(&self, folder: &str) -> bool {
        self.folders.iter().any(|f| f == folder)
    }
}

impl FollowUp {
    fn latest_content(&self) -> Option<&str> {
        self.history.first().map(|r| r.content.as_str())
    }
}
