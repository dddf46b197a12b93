use super::ParseError;
use crate::hours::WeekDay;

const DAY_NAMES: &[(&str, u8)] = &[
    ("sun", 0),
    ("sunday", 0),
    ("mon", 1),
    ("monday", 1),
    ("tue", 2),
    ("tues", 2),
    ("tuesday", 2),
    ("wed", 3),
    ("weds", 3),
    ("wednesday", 3),
    ("thu", 4),
    ("thur", 4),
    ("thurs", 4),
    ("thursday", 4),
    ("fri", 5),
    ("friday", 5),
    ("sat", 6),
    ("saturday", 6),
];

fn lookup_day(name: &str) -> Option<u8> {
    DAY_NAMES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, index)| *index)
}

/// Resolves `Mon`, `Mon-Thu` or a wrapping range like `Sat-Sun` into weekdays,
/// in the order they are walked.
pub fn parse_day_range(text: &str) -> Result<Vec<WeekDay>, ParseError> {
    let normalized = text.trim().to_lowercase();
    let unknown = || ParseError::UnknownDayName(normalized.clone());

    let indices: Vec<u8> = match normalized.split_once('-') {
        Some((start, end)) => {
            let start = lookup_day(start.trim()).ok_or_else(unknown)?;
            let end = lookup_day(end.trim()).ok_or_else(unknown)?;
            if end >= start {
                (start..=end).collect()
            } else {
                (start..7).chain(0..=end).collect()
            }
        }
        None => vec![lookup_day(&normalized).ok_or_else(unknown)?],
    };

    Ok(indices.into_iter().filter_map(WeekDay::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn indices(text: &str) -> Vec<u8> {
        parse_day_range(text)
            .unwrap()
            .into_iter()
            .map(WeekDay::index)
            .collect()
    }

    #[test_case("Sun", vec![0])]
    #[test_case("monday", vec![1])]
    #[test_case("Tues", vec![2])]
    #[test_case("THURS", vec![4])]
    #[test_case("Mon-Thu", vec![1, 2, 3, 4])]
    #[test_case("Sat-Sun", vec![6, 0] ; "wraps through the weekend")]
    #[test_case("Fri-Tue", vec![5, 6, 0, 1, 2])]
    #[test_case("Wed-Wed", vec![3] ; "single day range")]
    #[test_case(" Mon - Fri ", vec![1, 2, 3, 4, 5] ; "padded ends")]
    fn resolves_days(text: &str, expected: Vec<u8>) {
        assert_eq!(indices(text), expected);
    }

    #[test_case("Funday")]
    #[test_case("Mon-Funday")]
    #[test_case("Mon-")]
    #[test_case("Mon-Tue-Wed")]
    #[test_case("" ; "empty")]
    fn rejects_unknown_names(text: &str) {
        assert!(matches!(
            parse_day_range(text),
            Err(ParseError::UnknownDayName(_))
        ));
    }
}
