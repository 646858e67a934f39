use crate::error::FieldErrors;
use validator::Validate;

pub fn validate<T: Validate>(val: &T) -> Result<(), FieldErrors> {
    val.validate().map_err(FieldErrors::from)
}
