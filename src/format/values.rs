//! Cell extraction helpers for Arrow arrays.
//!
//! Dataset files arrive with whatever column types schema inference picked,
//! so every extractor dispatches on the runtime data type and treats nulls
//! and missing-value markers as absent.

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;

/// Extract a trimmed string value from an array at the given index.
///
/// Returns `None` for nulls, empty cells, and missing-value markers.
#[must_use]
pub fn cell_to_string(array: &ArrayRef, index: usize) -> Option<String> {
    if array.is_null(index) {
        return None;
    }

    let value = match array.data_type() {
        DataType::Utf8 => {
            let strings = array.as_any().downcast_ref::<StringArray>()?;
            strings.value(index).trim().to_string()
        }
        DataType::Int64 => {
            let ints = array.as_any().downcast_ref::<Int64Array>()?;
            ints.value(index).to_string()
        }
        DataType::Float64 => {
            let floats = array.as_any().downcast_ref::<Float64Array>()?;
            floats.value(index).to_string()
        }
        DataType::Boolean => {
            let bools = array.as_any().downcast_ref::<BooleanArray>()?;
            bools.value(index).to_string()
        }
        _ => return None,
    };

    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value)
    }
}

/// Interpret a cell as a boolean indicator.
///
/// Accepts `1/0`, `true/false`, and `yes/no` case-insensitively; anything
/// else, including nulls and blanks, is falsy.
#[must_use]
pub fn cell_is_truthy(array: &ArrayRef, index: usize) -> bool {
    if array.is_null(index) {
        return false;
    }

    match array.data_type() {
        DataType::Boolean => array
            .as_any()
            .downcast_ref::<BooleanArray>()
            .is_some_and(|bools| bools.value(index)),
        DataType::Int64 => array
            .as_any()
            .downcast_ref::<Int64Array>()
            .is_some_and(|ints| ints.value(index) != 0),
        DataType::Float64 => array
            .as_any()
            .downcast_ref::<Float64Array>()
            .is_some_and(|floats| floats.value(index) != 0.0),
        DataType::Utf8 => array
            .as_any()
            .downcast_ref::<StringArray>()
            .is_some_and(|strings| {
                let value = strings.value(index).trim();
                value == "1"
                    || value.eq_ignore_ascii_case("true")
                    || value.eq_ignore_ascii_case("yes")
            }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn string_cells_trim_and_drop_markers() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![
            Some(" fever "),
            Some(""),
            Some("NaN"),
            None,
        ]));
        assert_eq!(cell_to_string(&array, 0).as_deref(), Some("fever"));
        assert_eq!(cell_to_string(&array, 1), None);
        assert_eq!(cell_to_string(&array, 2), None);
        assert_eq!(cell_to_string(&array, 3), None);
    }

    #[test]
    fn truthiness_across_types() {
        let strings: ArrayRef = Arc::new(StringArray::from(vec![
            Some("1"),
            Some("YES"),
            Some("true"),
            Some("0"),
            Some("no"),
            Some("maybe"),
            None,
        ]));
        let expectations = [true, true, true, false, false, false, false];
        for (index, expected) in expectations.into_iter().enumerate() {
            assert_eq!(cell_is_truthy(&strings, index), expected, "index {index}");
        }

        let ints: ArrayRef = Arc::new(Int64Array::from(vec![Some(1), Some(0), None]));
        assert!(cell_is_truthy(&ints, 0));
        assert!(!cell_is_truthy(&ints, 1));
        assert!(!cell_is_truthy(&ints, 2));

        let bools: ArrayRef = Arc::new(BooleanArray::from(vec![true, false]));
        assert!(cell_is_truthy(&bools, 0));
        assert!(!cell_is_truthy(&bools, 1));
    }
}
