use crate::shared::constants::{IMAGE_STEM_MARKER, JPG_EXTENSION};

/// `image_001` -> `001.jpg`; stems without the marker keep their name.
/// The last occurrence of the marker wins (`my_image_7` -> `7.jpg`).
pub fn jpg_name_for(stem: &str) -> String {
    let base = match stem.rfind(IMAGE_STEM_MARKER) {
        Some(pos) => &stem[pos + IMAGE_STEM_MARKER.len()..],
        None => stem,
    };
    format!("{}.{}", base, JPG_EXTENSION)
}
