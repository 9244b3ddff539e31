//! Listing field validation.

use crate::types::MinorUnits;

/// Maximum number of images attached to one listing.
pub const MAX_LISTING_IMAGES: usize = 5;

/// Maximum length of a listing title, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Validate a required free-text field: non-blank after trimming.
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

/// Validate a listing title.
pub fn validate_title(title: &str) -> Result<(), String> {
    validate_required("Title", title)?;
    let len = title.trim().chars().count();
    if len > MAX_TITLE_CHARS {
        return Err(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters, got {len}"
        ));
    }
    Ok(())
}

/// Validate an asking price. Must be strictly positive.
pub fn validate_price(price: MinorUnits) -> Result<(), String> {
    if price <= 0 {
        return Err(format!("Price must be a positive amount, got {price}"));
    }
    Ok(())
}

/// Validate the image list of a listing: at least one, at most
/// [`MAX_LISTING_IMAGES`], none blank.
pub fn validate_images(images: &[String]) -> Result<(), String> {
    if images.is_empty() {
        return Err("Please upload at least one image".to_string());
    }
    if images.len() > MAX_LISTING_IMAGES {
        return Err(format!(
            "A listing may have at most {MAX_LISTING_IMAGES} images, got {}",
            images.len()
        ));
    }
    if images.iter().any(|p| p.trim().is_empty()) {
        return Err("Image paths must not be blank".to_string());
    }
    Ok(())
}
