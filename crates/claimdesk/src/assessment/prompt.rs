use serde::Serialize;

use crate::claim::MediaFile;

/// Which assessment is being produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Media,
    Summary,
    Final,
    Quality,
}

impl AssessmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Summary => "summary",
            Self::Final => "final",
            Self::Quality => "quality",
        }
    }

    /// Notice returned in place of the text when generation fails.
    pub fn fallback_text(&self) -> &'static str {
        match self {
            Self::Media => "Error generating media assessment. Please try again later.",
            Self::Summary => "Error generating summary assessment. Please try again later.",
            Self::Final => "Error generating final assessment. Please try again later.",
            Self::Quality => "Error generating quality review. Please try again later.",
        }
    }
}

impl std::fmt::Display for AssessmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to an assessment provider. Validation has already happened by the
/// time a provider sees one of these.
#[derive(Debug, Clone)]
pub enum AssessmentRequest {
    Media { media_files: Vec<MediaFile> },
    Summary { summary: String },
    Final { media_files: Vec<MediaFile>, summary: String },
    Quality { assessment: String },
}

impl AssessmentRequest {
    pub fn kind(&self) -> AssessmentKind {
        match self {
            Self::Media { .. } => AssessmentKind::Media,
            Self::Summary { .. } => AssessmentKind::Summary,
            Self::Final { .. } => AssessmentKind::Final,
            Self::Quality { .. } => AssessmentKind::Quality,
        }
    }

    /// Instruction text sent to a text-generation model.
    pub fn prompt(&self) -> String {
        match self {
            Self::Media { media_files } => format!(
                "Analyze these insurance claim media files: {}.\n\
                 Focus on:\n\
                 1. Number and types of files\n\
                 2. Quality of documentation\n\
                 3. Visible damage\n\
                 4. Missing information",
                media_json(media_files)
            ),
            Self::Summary { summary } => format!(
                "Analyze this insurance claim summary: {}.\n\
                 Focus on:\n\
                 1. Key points\n\
                 2. Damage description\n\
                 3. Urgency level\n\
                 4. Missing details",
                summary.trim()
            ),
            Self::Final {
                media_files,
                summary,
            } => format!(
                "Analyze this complete insurance claim:\n\
                 Media Files: {}\n\
                 Summary: {}\n\
                 Focus on:\n\
                 1. Overall assessment\n\
                 2. Damage severity\n\
                 3. Required actions\n\
                 4. Priority level",
                media_json(media_files),
                summary.trim()
            ),
            Self::Quality { assessment } => format!(
                "Review the quality of this insurance claim assessment:\n\
                 {}\n\
                 Focus on:\n\
                 1. Completeness\n\
                 2. Consistency of cost estimates\n\
                 3. Clarity of required actions\n\
                 4. Concerns before approval",
                assessment.trim()
            ),
        }
    }
}

fn media_json(media_files: &[MediaFile]) -> String {
    serde_json::to_string(media_files).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::MediaKind;

    fn photo() -> MediaFile {
        MediaFile {
            id: "f1".into(),
            name: "bumper.jpg".into(),
            kind: MediaKind::Image,
            size: 1024,
            last_modified: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_media_prompt_embeds_descriptors() {
        let prompt = AssessmentRequest::Media {
            media_files: vec![photo()],
        }
        .prompt();
        assert!(prompt.starts_with("Analyze these insurance claim media files: [{"));
        assert!(prompt.contains(r#""name":"bumper.jpg""#));
        assert!(prompt.contains(r#""type":"image""#));
        assert!(prompt.ends_with("4. Missing information"));
    }

    #[test]
    fn test_final_prompt_has_both_inputs() {
        let prompt = AssessmentRequest::Final {
            media_files: vec![photo()],
            summary: "  Rear-ended at a light.  ".into(),
        }
        .prompt();
        assert!(prompt.contains("Media Files: [{"));
        assert!(prompt.contains("Summary: Rear-ended at a light.\n"));
        assert!(prompt.contains("4. Priority level"));
    }

    #[test]
    fn test_kinds() {
        let request = AssessmentRequest::Quality {
            assessment: "ok".into(),
        };
        assert_eq!(request.kind(), AssessmentKind::Quality);
        assert_eq!(
            AssessmentKind::Final.fallback_text(),
            "Error generating final assessment. Please try again later."
        );
    }
}
