//! Input contract and pure validation rules for create/update.
//!
//! # Responsibility
//! - Define the explicit input shape accepted by the record service.
//! - Validate every field and report all failures together.
//! - Classify uploaded photos by content, not by declared metadata alone.
//!
//! # Invariants
//! - Validation is pure: it never touches storage or the file system.
//! - A `ValidatedSuperhero` always satisfies the name/photo constraints.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum character count for `real_name` and `hero_name`.
pub const MAX_NAME_CHARS: usize = 255;
/// Maximum accepted photo size (2048 KB).
pub const MAX_PHOTO_BYTES: usize = 2048 * 1024;

pub const FIELD_REAL_NAME: &str = "real_name";
pub const FIELD_HERO_NAME: &str = "hero_name";
pub const FIELD_PHOTO: &str = "photo";

const ALLOWED_EXTENSIONS: [&str; 5] = ["jpeg", "png", "jpg", "gif", "svg"];
const SVG_SNIFF_BYTES: usize = 1024;

static SVG_ROOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<svg[\s>/]").expect("valid svg root regex"));

/// Uploaded photo as extracted by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// Declared MIME type (e.g. `image/png`).
    pub content_type: String,
    /// Client-side file name, when the transport provides one.
    pub file_name: Option<String>,
}

impl PhotoUpload {
    pub fn new(bytes: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Unvalidated create/update input.
///
/// Names are optional here so that a missing field is representable and
/// reported as a validation failure rather than a transport error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuperheroInput {
    pub real_name: Option<String>,
    pub hero_name: Option<String>,
    pub additional_info: Option<String>,
    pub photo: Option<PhotoUpload>,
}

impl SuperheroInput {
    pub fn new(real_name: impl Into<String>, hero_name: impl Into<String>) -> Self {
        Self {
            real_name: Some(real_name.into()),
            hero_name: Some(hero_name.into()),
            additional_info: None,
            photo: None,
        }
    }

    pub fn with_additional_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    pub fn with_photo(mut self, photo: PhotoUpload) -> Self {
        self.photo = Some(photo);
        self
    }
}

/// Image formats accepted for photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoKind {
    Jpeg,
    Png,
    Gif,
    Svg,
}

impl PhotoKind {
    /// File extension used when the photo is stored.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Svg => "svg",
        }
    }

    /// Canonical MIME type served back to clients.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Svg => "image/svg+xml",
        }
    }

    /// Maps a declared MIME type onto an accepted kind.
    pub fn from_content_type(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/svg+xml" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Maps a file extension onto an accepted kind.
    pub fn from_extension(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    /// Detects the image kind from file content.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if looks_like_svg(bytes) {
            return Some(Self::Svg);
        }
        None
    }
}

/// Photo that passed type and size checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPhoto {
    pub kind: PhotoKind,
    pub bytes: Vec<u8>,
}

/// Input that satisfies the validation contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSuperhero {
    pub real_name: String,
    pub hero_name: String,
    pub additional_info: Option<String>,
    pub photo: Option<ValidatedPhoto>,
}

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationError {
    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn reason(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn insert(&mut self, field: &'static str, reason: String) {
        self.errors.entry(field).or_insert(reason);
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed")?;
        for (index, (field, reason)) in self.errors.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };
            write!(f, "{separator}{field}: {reason}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Validates create/update input and normalizes text fields.
///
/// # Contract
/// - Names are trimmed, required and limited to `MAX_NAME_CHARS` characters.
/// - `additional_info` is trimmed; blank values become `None`.
/// - Photos must be non-empty, at most `MAX_PHOTO_BYTES`, and their content
///   must be jpeg/png/gif/svg. A declared image MIME type must name the same
///   format; other declared types and the client file name are not trusted.
///
/// # Errors
/// - Returns every failing field at once.
pub fn validate_input(input: SuperheroInput) -> Result<ValidatedSuperhero, ValidationError> {
    let mut failures = ValidationError::default();

    let real_name = validate_name(FIELD_REAL_NAME, input.real_name, &mut failures);
    let hero_name = validate_name(FIELD_HERO_NAME, input.hero_name, &mut failures);
    let additional_info = input
        .additional_info
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    let photo = match input.photo {
        Some(upload) => match validate_photo(upload) {
            Ok(photo) => Some(photo),
            Err(reason) => {
                failures.insert(FIELD_PHOTO, reason);
                None
            }
        },
        None => None,
    };

    match (real_name, hero_name) {
        (Some(real_name), Some(hero_name)) if failures.is_empty() => Ok(ValidatedSuperhero {
            real_name,
            hero_name,
            additional_info,
            photo,
        }),
        _ => Err(failures),
    }
}

fn validate_name(
    field: &'static str,
    value: Option<String>,
    failures: &mut ValidationError,
) -> Option<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        failures.insert(field, format!("The {field} field is required."));
        return None;
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        failures.insert(
            field,
            format!("The {field} may not be greater than {MAX_NAME_CHARS} characters."),
        );
        return None;
    }
    Some(trimmed.to_string())
}

fn validate_photo(upload: PhotoUpload) -> Result<ValidatedPhoto, String> {
    if upload.bytes.is_empty() {
        return Err(format!("The {FIELD_PHOTO} failed to upload."));
    }

    let kind = PhotoKind::sniff(&upload.bytes)
        .ok_or_else(|| format!("The {FIELD_PHOTO} must be an image."))?;

    // Generic or unknown declared types defer to the content.
    let declared = PhotoKind::from_content_type(&upload.content_type);
    if declared.is_some_and(|declared| declared != kind) {
        return Err(format!(
            "The {FIELD_PHOTO} must be a file of type: {}.",
            ALLOWED_EXTENSIONS.join(", ")
        ));
    }

    if upload.bytes.len() > MAX_PHOTO_BYTES {
        return Err(format!(
            "The {FIELD_PHOTO} may not be greater than {} kilobytes.",
            MAX_PHOTO_BYTES / 1024
        ));
    }

    Ok(ValidatedPhoto {
        kind,
        bytes: upload.bytes,
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let prefix = &bytes[..bytes.len().min(SVG_SNIFF_BYTES)];
    let text = String::from_utf8_lossy(prefix);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with('<') && SVG_ROOT_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::{
        validate_input, PhotoKind, PhotoUpload, SuperheroInput, FIELD_HERO_NAME, FIELD_PHOTO,
        FIELD_REAL_NAME, MAX_NAME_CHARS, MAX_PHOTO_BYTES,
    };

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(len: usize) -> Vec<u8> {
        let mut bytes = PNG_HEADER.to_vec();
        bytes.resize(len.max(PNG_HEADER.len()), 0);
        bytes
    }

    #[test]
    fn valid_input_is_trimmed_and_normalized() {
        let input = SuperheroInput::new("  Peter Parker ", "Spider-Man\n").with_additional_info("   ");
        let validated = validate_input(input).expect("input should validate");
        assert_eq!(validated.real_name, "Peter Parker");
        assert_eq!(validated.hero_name, "Spider-Man");
        assert_eq!(validated.additional_info, None);
        assert!(validated.photo.is_none());
    }

    #[test]
    fn missing_and_blank_names_are_reported_together() {
        let input = SuperheroInput {
            real_name: None,
            hero_name: Some("   ".to_string()),
            ..SuperheroInput::default()
        };
        let error = validate_input(input).expect_err("names are required");
        assert!(error.has_field(FIELD_REAL_NAME));
        assert!(error.has_field(FIELD_HERO_NAME));
        assert_eq!(error.errors().len(), 2);
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let at_limit = "é".repeat(MAX_NAME_CHARS);
        validate_input(SuperheroInput::new(at_limit, "Hero")).expect("255 chars is allowed");

        let over_limit = "a".repeat(MAX_NAME_CHARS + 1);
        let error = validate_input(SuperheroInput::new("Real", over_limit))
            .expect_err("256 chars is rejected");
        assert!(error
            .reason(FIELD_HERO_NAME)
            .unwrap_or("")
            .contains("255 characters"));
    }

    #[test]
    fn sniff_recognizes_supported_formats() {
        assert_eq!(PhotoKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(PhotoKind::Jpeg));
        assert_eq!(PhotoKind::sniff(&png(16)), Some(PhotoKind::Png));
        assert_eq!(PhotoKind::sniff(b"GIF89a\x01\x00"), Some(PhotoKind::Gif));
        assert_eq!(
            PhotoKind::sniff(b"<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
            Some(PhotoKind::Svg)
        );
        assert_eq!(PhotoKind::sniff(b"just some notes"), None);
    }

    #[test]
    fn text_file_is_not_an_image() {
        let photo = PhotoUpload::new(b"hello world".to_vec(), "text/plain").with_file_name("bio.txt");
        let error = validate_input(SuperheroInput::new("Real", "Hero").with_photo(photo))
            .expect_err("text upload must fail");
        assert_eq!(error.reason(FIELD_PHOTO), Some("The photo must be an image."));
    }

    #[test]
    fn declared_type_must_match_content() {
        let photo = PhotoUpload::new(png(32), "image/gif");
        let error = validate_input(SuperheroInput::new("Real", "Hero").with_photo(photo))
            .expect_err("mismatched type must fail");
        assert!(error.reason(FIELD_PHOTO).unwrap_or("").contains("jpeg, png, jpg, gif, svg"));
    }

    #[test]
    fn content_decides_when_declared_type_is_generic() {
        let photo = PhotoUpload::new(png(32), "application/octet-stream");
        let validated = validate_input(SuperheroInput::new("Real", "Hero").with_photo(photo))
            .expect("generic type with png content is allowed");
        assert_eq!(validated.photo.map(|photo| photo.kind), Some(PhotoKind::Png));

        let renamed = PhotoUpload::new(png(32), "image/png").with_file_name("avatar.bmp");
        let validated = validate_input(SuperheroInput::new("Real", "Hero").with_photo(renamed))
            .expect("client file name does not override content");
        assert_eq!(validated.photo.map(|photo| photo.kind), Some(PhotoKind::Png));
    }

    #[test]
    fn photo_size_limit_is_inclusive() {
        let at_limit = PhotoUpload::new(png(MAX_PHOTO_BYTES), "image/png").with_file_name("a.png");
        let validated = validate_input(SuperheroInput::new("Real", "Hero").with_photo(at_limit))
            .expect("2048 KB is allowed");
        assert_eq!(validated.photo.map(|photo| photo.kind), Some(PhotoKind::Png));

        let over_limit = PhotoUpload::new(png(MAX_PHOTO_BYTES + 1), "image/png");
        let error = validate_input(SuperheroInput::new("Real", "Hero").with_photo(over_limit))
            .expect_err("over 2048 KB must fail");
        assert!(error.reason(FIELD_PHOTO).unwrap_or("").contains("2048 kilobytes"));
    }

    #[test]
    fn empty_photo_fails_upload() {
        let photo = PhotoUpload::new(Vec::new(), "image/png");
        let error = validate_input(SuperheroInput::new("Real", "Hero").with_photo(photo))
            .expect_err("empty upload must fail");
        assert!(error.reason(FIELD_PHOTO).unwrap_or("").contains("failed to upload"));
    }

    #[test]
    fn display_lists_every_field() {
        let error = validate_input(SuperheroInput::default()).expect_err("empty input fails");
        let rendered = error.to_string();
        assert!(rendered.starts_with("validation failed: "));
        assert!(rendered.contains("hero_name"));
        assert!(rendered.contains("real_name"));
    }
}
