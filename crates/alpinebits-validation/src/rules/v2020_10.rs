//! Rules introduced with AlpineBits 2020-10.

use super::ClosingSeason;
use crate::error::{ValidationError, ValidationResult};
use crate::path::ValidationPath;
use crate::validator::Validator;
use chrono::NaiveDate;

/// Element holding one closing season.
pub const STATUS_APPLICATION_CONTROL: &str = "StatusApplicationControl";

/// Checks that the closing seasons of a FreeRooms document are well-formed
/// and do not overlap.
///
/// Errors point at `StatusApplicationControl[i]` of the offending season.
///
/// ```
/// use alpinebits_validation::rules::v2020_10::ClosingSeasonsOverlapValidator;
/// use alpinebits_validation::rules::ClosingSeason;
/// use alpinebits_validation::{ValidationPath, Validator};
///
/// let seasons = [
///     ClosingSeason::new("2021-01-01", "2021-01-31"),
///     ClosingSeason::new("2021-01-15", "2021-02-15"),
/// ];
/// let err = ClosingSeasonsOverlapValidator
///     .validate(&seasons[..], &(), &ValidationPath::from_path("Inventories"))
///     .unwrap_err();
///
/// assert_eq!(err.path.as_str(), "Inventories->StatusApplicationControl[1]");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosingSeasonsOverlapValidator;

impl Validator<[ClosingSeason]> for ClosingSeasonsOverlapValidator {
    fn validate(
        &self,
        seasons: &[ClosingSeason],
        _ctx: &(),
        path: &ValidationPath,
    ) -> ValidationResult {
        let base = path.with_element(STATUS_APPLICATION_CONTROL);

        let mut periods = Vec::with_capacity(seasons.len());
        for (i, season) in seasons.iter().enumerate() {
            let item = base.with_index(i);
            let start = parse_date(&season.start, &item.with_attribute("Start"))?;
            let end = parse_date(&season.end, &item.with_attribute("End"))?;
            if start > end {
                return Err(ValidationError::new(
                    &item,
                    format!(
                        "closing season start {} is after its end {}",
                        season.start, season.end
                    ),
                ));
            }
            periods.push((start, end, i));
        }

        periods.sort_unstable();
        for pair in periods.windows(2) {
            let (_, earlier_end, earlier) = pair[0];
            let (later_start, _, later) = pair[1];
            if later_start <= earlier_end {
                let (reported, other) = (earlier.max(later), earlier.min(later));
                return Err(ValidationError::new(
                    &base.with_index(reported),
                    format!("closing season overlaps closing season at index {other}"),
                ));
            }
        }
        Ok(())
    }
}

impl Validator<Vec<ClosingSeason>> for ClosingSeasonsOverlapValidator {
    fn validate(
        &self,
        seasons: &Vec<ClosingSeason>,
        ctx: &(),
        path: &ValidationPath,
    ) -> ValidationResult {
        <Self as Validator<[ClosingSeason]>>::validate(self, seasons, ctx, path)
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(value: &str, path: &ValidationPath) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| ValidationError::new(path, format!("'{value}' is not a date (YYYY-MM-DD): {e}")))
}
