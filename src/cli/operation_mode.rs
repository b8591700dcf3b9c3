//! Operation mode selection from positional arguments

use crate::cli::args::Args;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationMode {
    /// No image given: print usage and exit cleanly
    Usage,

    /// Print the tags sharing `image`'s config digest
    ListEquivalents { image: String },

    /// Store `image`'s manifest under `new_tag`
    AddTag { image: String, new_tag: String },
}

impl OperationMode {
    pub fn from_args(args: &Args) -> Self {
        match (&args.image, &args.new_tag) {
            (Some(image), Some(new_tag)) => OperationMode::AddTag {
                image: image.clone(),
                new_tag: new_tag.clone(),
            },
            (Some(image), None) => OperationMode::ListEquivalents {
                image: image.clone(),
            },
            _ => OperationMode::Usage,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OperationMode::Usage => "Print usage",
            OperationMode::ListEquivalents { .. } => "List tags sharing the image's config digest",
            OperationMode::AddTag { .. } => "Add a tag to the image",
        }
    }

    /// Image reference as typed by the user, if any
    pub fn image(&self) -> Option<&str> {
        match self {
            OperationMode::Usage => None,
            OperationMode::ListEquivalents { image } | OperationMode::AddTag { image, .. } => {
                Some(image)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(image: Option<&str>, new_tag: Option<&str>) -> Args {
        Args {
            image: image.map(String::from),
            new_tag: new_tag.map(String::from),
            ..Args::default()
        }
    }

    #[test]
    fn test_mode_from_positional_count() {
        assert_eq!(OperationMode::from_args(&args(None, None)), OperationMode::Usage);
        assert_eq!(
            OperationMode::from_args(&args(Some("reg/img"), None)),
            OperationMode::ListEquivalents {
                image: "reg/img".to_string()
            }
        );
        assert_eq!(
            OperationMode::from_args(&args(Some("reg/img"), Some("v2"))),
            OperationMode::AddTag {
                image: "reg/img".to_string(),
                new_tag: "v2".to_string()
            }
        );
    }

    #[test]
    fn test_image_accessor() {
        assert_eq!(OperationMode::Usage.image(), None);
        assert_eq!(
            OperationMode::from_args(&args(Some("reg/img:v1"), Some("v2"))).image(),
            Some("reg/img:v1")
        );
    }
}
