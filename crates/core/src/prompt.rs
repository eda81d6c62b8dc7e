// crates/core/src/prompt.rs
//! Prompt assembly for diagram generation.
//!
//! Pure text transformation: takes the caller's description plus the
//! diagram/aspect/resolution tags and appends the legibility and notation
//! requirements the image model needs to produce readable diagrams.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of diagram being requested.
///
/// Unknown tags fall back to [`DiagramType::Generic`] rather than failing:
/// the type only tunes the prompt, it never gates generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramType {
    Architecture,
    Flowchart,
    DataFlow,
    Sequence,
    Infographic,
    Generic,
}

impl DiagramType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramType::Architecture => "architecture",
            DiagramType::Flowchart => "flowchart",
            DiagramType::DataFlow => "data_flow",
            DiagramType::Sequence => "sequence",
            DiagramType::Infographic => "infographic",
            DiagramType::Generic => "generic",
        }
    }

    /// Parse a tag, falling back to `Generic` for anything unrecognized.
    pub fn parse_or_generic(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "architecture" => DiagramType::Architecture,
            "flowchart" => DiagramType::Flowchart,
            "data_flow" => DiagramType::DataFlow,
            "sequence" => DiagramType::Sequence,
            "infographic" => DiagramType::Infographic,
            _ => DiagramType::Generic,
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aspect ratio tag understood by the image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "21:9")]
    Wide,
    #[serde(rename = "3:4")]
    VerticalPortrait,
    #[serde(rename = "4:3")]
    HorizontalLandscape,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Wide => "21:9",
            AspectRatio::VerticalPortrait => "3:4",
            AspectRatio::HorizontalLandscape => "4:3",
        }
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1:1" => Ok(AspectRatio::Square),
            "9:16" => Ok(AspectRatio::Portrait),
            "16:9" => Ok(AspectRatio::Landscape),
            "21:9" => Ok(AspectRatio::Wide),
            "3:4" => Ok(AspectRatio::VerticalPortrait),
            "4:3" => Ok(AspectRatio::HorizontalLandscape),
            other => Err(format!("unsupported aspect ratio: {other}")),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output resolution tag understood by the image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1K")]
    Standard,
    #[serde(rename = "2K")]
    High,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Standard => "1K",
            Resolution::High => "2K",
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1K" => Ok(Resolution::Standard),
            "2K" => Ok(Resolution::High),
            other => Err(format!("unsupported resolution: {other}")),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the model-ready prompt from a base description.
///
/// Appends text-legibility requirements, the aspect-ratio and resolution
/// lines, and a notation hint for diagram types with a standard notation.
pub fn build_prompt(
    description: &str,
    diagram_type: DiagramType,
    aspect_ratio: AspectRatio,
    resolution: Resolution,
) -> String {
    let mut requirements: Vec<String> = Vec::new();

    requirements.push(
        "All text must be crystal clear and perfectly legible. \
         Ensure proper contrast between text and background."
            .to_string(),
    );
    requirements.push(format!("Use {} aspect ratio.", aspect_ratio.as_str()));
    requirements.push(format!("Generate at {} resolution.", resolution.as_str()));

    match diagram_type {
        DiagramType::Architecture => {
            requirements.push("Use standard architecture diagram notation.".to_string());
        }
        DiagramType::Flowchart => {
            requirements.push("Use standard flowchart symbols.".to_string());
        }
        DiagramType::Sequence => {
            requirements.push("Use standard UML sequence notation.".to_string());
        }
        DiagramType::DataFlow | DiagramType::Infographic | DiagramType::Generic => {}
    }

    format!("{}\n\n{}", description.trim(), requirements.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_type_parse_known_tags() {
        assert_eq!(
            DiagramType::parse_or_generic("architecture"),
            DiagramType::Architecture
        );
        assert_eq!(
            DiagramType::parse_or_generic("FLOWCHART"),
            DiagramType::Flowchart
        );
        assert_eq!(
            DiagramType::parse_or_generic("data_flow"),
            DiagramType::DataFlow
        );
    }

    #[test]
    fn test_diagram_type_unknown_falls_back_to_generic() {
        assert_eq!(DiagramType::parse_or_generic("venn"), DiagramType::Generic);
        assert_eq!(DiagramType::parse_or_generic(""), DiagramType::Generic);
    }

    #[test]
    fn test_aspect_ratio_round_trip() {
        for tag in ["1:1", "9:16", "16:9", "21:9", "3:4", "4:3"] {
            let ratio: AspectRatio = tag.parse().unwrap();
            assert_eq!(ratio.as_str(), tag);
        }
    }

    #[test]
    fn test_aspect_ratio_rejects_unknown() {
        assert!("4:5".parse::<AspectRatio>().is_err());
        assert!("wide".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_resolution_parse_is_case_insensitive() {
        assert_eq!("1k".parse::<Resolution>().unwrap(), Resolution::Standard);
        assert_eq!("2K".parse::<Resolution>().unwrap(), Resolution::High);
        assert!("4K".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_build_prompt_includes_requirements() {
        let prompt = build_prompt(
            "A three-tier web app",
            DiagramType::Architecture,
            AspectRatio::Landscape,
            Resolution::High,
        );

        assert!(prompt.starts_with("A three-tier web app\n\n"));
        assert!(prompt.contains("crystal clear and perfectly legible"));
        assert!(prompt.contains("Use 16:9 aspect ratio."));
        assert!(prompt.contains("Generate at 2K resolution."));
        assert!(prompt.contains("standard architecture diagram notation"));
    }

    #[test]
    fn test_build_prompt_trims_description() {
        let prompt = build_prompt(
            "  payment flow  \n",
            DiagramType::Generic,
            AspectRatio::Square,
            Resolution::Standard,
        );
        assert!(prompt.starts_with("payment flow\n\n"));
    }

    #[test]
    fn test_build_prompt_no_notation_hint_for_generic() {
        let prompt = build_prompt(
            "something",
            DiagramType::Generic,
            AspectRatio::Landscape,
            Resolution::High,
        );
        assert!(!prompt.contains("notation"));
        assert!(!prompt.contains("symbols"));
    }

    #[test]
    fn test_sequence_gets_uml_notation() {
        let prompt = build_prompt(
            "login handshake",
            DiagramType::Sequence,
            AspectRatio::Landscape,
            Resolution::High,
        );
        assert!(prompt.contains("standard UML sequence notation"));
    }
}
