//! Schema validation for interaction reports.

use validator::Validate;

use crate::error::{Error, Result, ValidationErrorCode};
use crate::events::{InteractionAction, InteractionReport, ValidInteraction};
use crate::limits::{MAX_ID_LEN, MAX_RATING, MIN_RATING};

/// Validates a report and converts it into a typed interaction.
///
/// Checks run in a fixed order (ids, action, rating) so a report with
/// several problems always reports the same one. A rating given with a
/// non-purchase action is range-checked and then dropped.
pub fn validate_report(report: &InteractionReport) -> Result<ValidInteraction> {
    if let Err(errors) = report.validate() {
        let fields = errors.field_errors();

        for (field, wire_name) in [("user_id", "userId"), ("product_id", "productId")] {
            if let Some(field_errors) = fields.get(field) {
                if field_errors.iter().any(|e| e.code == "length") {
                    return Err(Error::validation(
                        ValidationErrorCode::IdentifierTooLong,
                        format!("{} exceeds {} characters", wire_name, MAX_ID_LEN),
                    ));
                }
                return Err(Error::validation(
                    ValidationErrorCode::MissingField,
                    format!("{} is required", wire_name),
                ));
            }
        }

        if fields.contains_key("rating") {
            return Err(rating_out_of_range(report.rating));
        }

        return Err(Error::validation(
            ValidationErrorCode::MalformedBody,
            errors.to_string(),
        ));
    }

    if report.action.trim().is_empty() {
        return Err(Error::validation(
            ValidationErrorCode::MissingField,
            "action is required",
        ));
    }
    let action: InteractionAction = report.action.parse()?;

    let rating = match report.rating {
        Some(stars) => {
            let stars = u8::try_from(stars).map_err(|_| rating_out_of_range(Some(stars)))?;
            action.accepts_rating().then_some(stars)
        }
        None => None,
    };

    Ok(ValidInteraction {
        user_id: report.user_id.trim().to_string(),
        product_id: report.product_id.trim().to_string(),
        action,
        rating,
    })
}

fn rating_out_of_range(rating: Option<i64>) -> Error {
    let shown = rating.map(|r| r.to_string()).unwrap_or_else(|| "null".into());
    Error::validation(
        ValidationErrorCode::RatingOutOfRange,
        format!(
            "rating {} must be between {} and {}",
            shown, MIN_RATING, MAX_RATING
        ),
    )
}
