//! The enabled docker image list, kept in the hub's `dockerImages`
//! preference.
//!
//! The preference holds the complete list; every mutation validates
//! locally, rewrites the list in memory, and hands the full list back
//! for resubmission.

use xhub_api::types::DockerImage;

use crate::error::CoreError;

/// Images ordered for display, case-insensitively by name.
pub fn sorted(mut images: Vec<DockerImage>) -> Vec<DockerImage> {
    images.sort_by(|a, b| a.image.to_uppercase().cmp(&b.image.to_uppercase()));
    images
}

/// Append an image. The name is required; a duplicate replaces the
/// existing entry rather than listing the image twice.
pub fn add(mut images: Vec<DockerImage>, entry: DockerImage) -> Result<Vec<DockerImage>, CoreError> {
    if entry.image.trim().is_empty() {
        return Err(CoreError::Validation {
            messages: vec!["Docker Image is a required field.".to_owned()],
        });
    }
    images.retain(|existing| existing.image != entry.image);
    images.push(entry);
    Ok(images)
}

/// Drop an image by name. The last remaining image cannot be removed;
/// the hub needs at least one to offer.
pub fn remove(mut images: Vec<DockerImage>, name: &str) -> Result<Vec<DockerImage>, CoreError> {
    if !images.iter().any(|img| img.image == name) {
        return Err(CoreError::NotFound {
            entity: "docker image",
            id: name.to_owned(),
        });
    }
    if images.len() <= 1 {
        return Err(CoreError::Validation {
            messages: vec!["Cannot delete the only image".to_owned()],
        });
    }
    images.retain(|img| img.image != name);
    Ok(images)
}

/// Flip the enabled flag of one image by name.
pub fn set_enabled(
    mut images: Vec<DockerImage>,
    name: &str,
    enabled: bool,
) -> Result<Vec<DockerImage>, CoreError> {
    let entry = images
        .iter_mut()
        .find(|img| img.image == name)
        .ok_or(CoreError::NotFound {
            entity: "docker image",
            id: name.to_owned(),
        })?;
    entry.enabled = enabled;
    Ok(images)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn image(name: &str, enabled: bool) -> DockerImage {
        DockerImage {
            image: name.to_owned(),
            enabled,
        }
    }

    #[test]
    fn sorted_ignores_case() {
        let images = sorted(vec![image("b/Notebook:2", true), image("A/notebook:1", true)]);
        assert_eq!(images[0].image, "A/notebook:1");
    }

    #[test]
    fn add_requires_an_image_name() {
        let err = add(vec![], image("  ", true)).unwrap_err();
        assert_eq!(
            err.validation_messages(),
            ["Docker Image is a required field."]
        );
    }

    #[test]
    fn add_replaces_an_existing_entry() {
        let images = add(vec![image("a:1", true)], image("a:1", false)).unwrap();
        assert_eq!(images.len(), 1);
        assert!(!images[0].enabled);
    }

    #[test]
    fn remove_keeps_the_rest() {
        let images = remove(vec![image("a:1", true), image("b:1", false)], "a:1").unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].image, "b:1");
    }

    #[test]
    fn remove_refuses_the_last_image() {
        let err = remove(vec![image("a:1", true)], "a:1").unwrap_err();
        assert_eq!(err.validation_messages(), ["Cannot delete the only image"]);
    }

    #[test]
    fn remove_of_unknown_image_is_not_found() {
        let err = remove(vec![image("a:1", true), image("b:1", true)], "c:1").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn set_enabled_flips_only_the_named_image() {
        let images =
            set_enabled(vec![image("a:1", true), image("b:1", true)], "a:1", false).unwrap();
        assert!(!images[0].enabled);
        assert!(images[1].enabled);
    }
}
