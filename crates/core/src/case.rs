//! Case intake validation.

use crate::error::CoreError;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Validate optional incident coordinates.
///
/// Either coordinate may be absent, but any value given must be finite and in
/// range.
pub fn validate_location(lat: Option<f64>, lng: Option<f64>) -> Result<(), CoreError> {
    if let Some(lat) = lat {
        if !lat.is_finite() || !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
            return Err(CoreError::validation(format!(
                "incident_location_lat must be between {MIN_LATITUDE} and {MAX_LATITUDE}, got {lat}"
            )));
        }
    }
    if let Some(lng) = lng {
        if !lng.is_finite() || !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lng) {
            return Err(CoreError::validation(format!(
                "incident_location_lng must be between {MIN_LONGITUDE} and {MAX_LONGITUDE}, got {lng}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absent_and_boundary_coordinates() {
        assert!(validate_location(None, None).is_ok());
        assert!(validate_location(Some(-90.0), Some(180.0)).is_ok());
        assert!(validate_location(Some(51.5), None).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(validate_location(Some(90.5), None).is_err());
        assert!(validate_location(None, Some(-181.0)).is_err());
        assert!(validate_location(Some(f64::NAN), None).is_err());
    }
}
