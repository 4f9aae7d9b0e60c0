//! The build wrapper always answers with text

use notion_formula::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn numbers_render_or_report(n in any::<f64>()) {
        let text = build(None).formula(|f| f.abs(n));
        if n.is_nan() {
            prop_assert_eq!(text, FormulaError::InvalidNumber.to_string());
        } else {
            prop_assert!(text.starts_with("abs(") && text.ends_with(')'));
        }
    }

    #[test]
    fn dates_render_or_report(ms in any::<i64>()) {
        let date = DateValue::from_timestamp_millis(ms);
        let text = build(None).formula(|f| f.year(date));
        if date.is_valid() {
            prop_assert_eq!(text, format!("year(fromTimestamp({ms}))"));
        } else {
            prop_assert_eq!(text, "Invalid date!");
        }
    }

    #[test]
    fn text_arguments_round_trip_through_json(s in ".*") {
        let text = build(None).formula(|f| f.length(s.as_str()));
        let literal = &text["length(".len()..text.len() - 1];
        let decoded: String = serde_json::from_str(literal).unwrap();
        prop_assert_eq!(decoded, s);
    }
}
