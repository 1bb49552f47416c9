//! Detection of culture-specific satellite resource files.
//!
//! `Strings.resx` is the neutral file that gets accessors; `Strings.fr-FR.resx` only
//! carries translations for the same keys and is looked up at runtime by the
//! resource manager, so generators skip it.

use std::path::Path;

use unic_langid::LanguageIdentifier;

/// Returns the culture of a satellite file such as `Strings.fr-FR.resx`.
///
/// Only the last dotted segment of the file stem is considered, and its language
/// subtag must be a lowercase two or three letter code, so `Errors.App.resx` is not
/// mistaken for a satellite.
pub fn satellite_culture<P: AsRef<Path>>(path: P) -> Option<LanguageIdentifier> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let (_, suffix) = stem.rsplit_once('.')?;
    let language = suffix.split(['-', '_']).next()?;
    if !(2..=3).contains(&language.len()) || language.chars().any(|c| !c.is_ascii_lowercase()) {
        return None;
    }
    suffix.parse::<LanguageIdentifier>().ok()
}

pub fn is_satellite<P: AsRef<Path>>(path: P) -> bool {
    satellite_culture(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_files() {
        assert!(!is_satellite("Strings.resx"));
        assert!(!is_satellite("Resources/Errors.App.resx"));
        assert!(!is_satellite("Resources/Strings.Designer.resx"));
    }

    #[test]
    fn test_satellite_files() {
        let culture = satellite_culture("Resources/Strings.fr-FR.resx").unwrap();
        assert_eq!(culture.language.as_str(), "fr");
        assert_eq!(culture.region.map(|r| r.as_str().to_string()).as_deref(), Some("FR"));

        assert!(is_satellite("Strings.de.resx"));
        assert!(is_satellite("Strings.zh-Hans.resx"));
    }
}
