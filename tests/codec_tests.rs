use pretty_assertions::assert_eq;
use schedule_mpx::codec::TaskIdLookup;
use schedule_mpx::codec::escape::{escape, restore_line_breaks, EOL_PLACEHOLDER};
use schedule_mpx::{
    AccrueType, ConstraintType, DataKind, Duration, LocaleData, MpxError, Priority, Rate, Relation,
    RelationType, TaskType, TimeUnit, Value, ValueCodec,
};
use std::io::Write;

/// Unique ids are the positional id times ten.
struct TenfoldIds;

impl TaskIdLookup for TenfoldIds {
    fn id_for_unique_id(&self, unique_id: i32) -> Option<i32> {
        (unique_id % 10 == 0).then_some(unique_id / 10)
    }

    fn unique_id_for_id(&self, id: i32) -> Option<i32> {
        Some(id * 10)
    }
}

fn format(locale: &LocaleData, kind: DataKind, value: impl Into<Value>) -> String {
    ValueCodec::new(&locale.settings, locale)
        .format(kind, Some(&value.into()))
        .unwrap()
}

fn parse(locale: &LocaleData, kind: DataKind, text: &str) -> Option<Value> {
    ValueCodec::new(&locale.settings, locale)
        .parse(kind, text)
        .unwrap()
}

#[test]
fn quotes_are_doubled_and_wrapped() {
    assert_eq!(escape(r#"He said "hi""#, ','), r#""He said ""hi""""#);
}

#[test]
fn delimiter_in_text_is_wrapped() {
    assert_eq!(escape("Smith, J", ','), "\"Smith, J\"");
    assert_eq!(escape("Smith; J", ','), "Smith; J");
    assert_eq!(escape("Smith; J", ';'), "\"Smith; J\"");
    assert_eq!(escape("", ','), "");
}

#[test]
fn line_breaks_use_the_placeholder() {
    let escaped = escape("first\r\nsecond\nthird", ',');
    assert_eq!(
        escaped,
        format!("first{EOL_PLACEHOLDER}second{EOL_PLACEHOLDER}third")
    );
    assert_eq!(restore_line_breaks(&escaped), "first\nsecond\nthird");
}

#[test]
fn absent_values_format_empty() {
    let locale = LocaleData::english();
    let codec = ValueCodec::new(&locale.settings, &locale);
    assert_eq!(codec.format(DataKind::Duration, None).unwrap(), "");
    assert_eq!(codec.format(DataKind::TaskType, None).unwrap(), "");
    assert_eq!(codec.parse(DataKind::Currency, "").unwrap(), None);
}

#[test]
fn priority_uses_its_band_name() {
    let locale = LocaleData::english();
    assert_eq!(format(&locale, DataKind::Priority, Priority::new(550)), "Medium");
    assert_eq!(format(&locale, DataKind::Priority, Priority::new(50)), "Lowest");
    assert_eq!(format(&locale, DataKind::Priority, Priority::new(1200)), "Do Not Level");
    assert_eq!(format(&locale, DataKind::Priority, Priority::new(Priority::HIGH)), "High");
    assert_eq!(Priority::new(550).band(), 5);
    assert_eq!(Priority::new(50).band(), 1);

    assert_eq!(
        parse(&locale, DataKind::Priority, "very high"),
        Some(Value::Priority(Priority::new(Priority::VERY_HIGH)))
    );
    assert_eq!(
        parse(&locale, DataKind::Priority, "urgent"),
        Some(Value::Priority(Priority::default()))
    );
}

#[test]
fn unknown_constraint_codes_fall_back_to_asap() {
    assert_eq!(ConstraintType::from_code(99), ConstraintType::AsSoonAsPossible);
    assert_eq!(ConstraintType::from_code(None), ConstraintType::AsSoonAsPossible);
    assert_eq!(ConstraintType::from_code(3), ConstraintType::MustFinishOn);

    let locale = LocaleData::english();
    assert_eq!(
        parse(&locale, DataKind::Constraint, "99"),
        Some(Value::Constraint(ConstraintType::AsSoonAsPossible))
    );
    assert_eq!(
        parse(&locale, DataKind::Constraint, "Must Start On"),
        Some(Value::Constraint(ConstraintType::MustStartOn))
    );
    assert_eq!(
        format(&locale, DataKind::Constraint, ConstraintType::StartNoEarlierThan),
        "Start No Earlier Than"
    );
}

#[test]
fn unknown_accrue_name_is_dropped() {
    let locale = LocaleData::english();
    assert_eq!(parse(&locale, DataKind::Accrue, "Sometimes"), None);
    assert_eq!(
        parse(&locale, DataKind::Accrue, "prorated"),
        Some(Value::Accrue(AccrueType::Prorated))
    );
    assert_eq!(format(&locale, DataKind::Accrue, AccrueType::End), "End");
}

#[test]
fn numeric_kinds_follow_their_patterns() {
    let locale = LocaleData::english();
    assert_eq!(format(&locale, DataKind::Currency, 1234.5), "$1,234.50");
    assert_eq!(format(&locale, DataKind::Units, 150.0), "1.5");
    assert_eq!(format(&locale, DataKind::Units, 100.0), "1");
    assert_eq!(format(&locale, DataKind::Percentage, 50.0), "50%");
    assert_eq!(format(&locale, DataKind::Numeric, 8.0), "8.00");
    assert_eq!(format(&locale, DataKind::Integer, 42), "42");

    assert_eq!(parse(&locale, DataKind::Units, "1.5"), Some(Value::Number(150.0)));
    assert_eq!(parse(&locale, DataKind::Percentage, "25%"), Some(Value::Number(25.0)));
    assert_eq!(parse(&locale, DataKind::Currency, "$1,234.50"), Some(Value::Number(1234.5)));
}

#[test]
fn durations_and_rates_carry_units() {
    let locale = LocaleData::english();
    assert_eq!(
        format(&locale, DataKind::Duration, Duration::new(2.5, TimeUnit::Days)),
        "2.5d"
    );
    assert_eq!(
        format(&locale, DataKind::Duration, Duration::new(3.0, TimeUnit::ElapsedWeeks)),
        "3ew"
    );
    assert_eq!(
        format(&locale, DataKind::Rate, Rate::new(25.0, TimeUnit::Hours)),
        "$25.00/h"
    );

    assert_eq!(
        parse(&locale, DataKind::Duration, "3w"),
        Some(Value::Duration(Duration::new(3.0, TimeUnit::Weeks)))
    );
    assert_eq!(
        parse(&locale, DataKind::Duration, "4"),
        Some(Value::Duration(Duration::days(4.0)))
    );
    assert_eq!(
        parse(&locale, DataKind::Rate, "$25.00/h"),
        Some(Value::Rate(Rate::new(25.0, TimeUnit::Hours)))
    );
}

#[test]
fn booleans_and_task_type_use_yes_no() {
    let locale = LocaleData::english();
    assert_eq!(format(&locale, DataKind::Boolean, true), "Yes");
    assert_eq!(format(&locale, DataKind::TaskType, TaskType::FixedDuration), "Yes");
    assert_eq!(format(&locale, DataKind::TaskType, TaskType::FixedWork), "No");
    assert_eq!(parse(&locale, DataKind::Boolean, "no"), Some(Value::Bool(false)));
    assert_eq!(parse(&locale, DataKind::Boolean, "1"), Some(Value::Bool(true)));
}

#[test]
fn mismatched_value_is_an_error() {
    let locale = LocaleData::english();
    let codec = ValueCodec::new(&locale.settings, &locale);
    let err = codec
        .format(DataKind::Duration, Some(&Value::from("soon")))
        .unwrap_err();
    assert!(matches!(
        err,
        MpxError::TypeMismatch {
            kind: DataKind::Duration,
            found: "text"
        }
    ));
}

#[test]
fn relations_render_positional_ids() {
    let locale = LocaleData::english();
    let codec = ValueCodec::new(&locale.settings, &locale).with_tasks(&TenfoldIds);
    let relations = vec![
        Relation::finish_start(10),
        Relation::new(20, RelationType::StartStart, Duration::days(2.0)),
        Relation::new(30, RelationType::FinishStart, Duration::days(-1.0)),
        Relation::new(40, RelationType::FinishFinish, Duration::zero()),
    ];

    let text = codec.format_relations(&relations).unwrap();
    assert_eq!(text, "1,2SS+2d,3FS-1d,4FF");
    assert_eq!(codec.parse_relations(&text).unwrap(), relations);
}

#[test]
fn relation_to_unknown_task_fails() {
    let locale = LocaleData::english();
    let codec = ValueCodec::new(&locale.settings, &locale).with_tasks(&TenfoldIds);
    let err = codec
        .format_relations(&[Relation::finish_start(7)])
        .unwrap_err();
    assert!(matches!(err, MpxError::InvalidData(_)));
}

#[test]
fn locale_round_trips_through_json() {
    let mut locale = LocaleData::english();
    locale.name = "en-GB".into();
    locale.settings.currency_symbol = "£".into();

    let json = locale.to_json_string().unwrap();
    assert_eq!(LocaleData::from_json_str(&json).unwrap(), locale);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    assert_eq!(LocaleData::from_json_path(file.path()).unwrap(), locale);
}

#[test]
fn short_name_table_is_rejected_at_load() {
    let mut json: serde_json::Value =
        serde_json::from_str(&LocaleData::english().to_json_string().unwrap()).unwrap();
    json["priority_types"] = serde_json::json!(["Low", "Medium", "High"]);

    let err = LocaleData::from_json_str(&json.to_string()).unwrap_err();
    assert!(matches!(err, MpxError::Json(_)));
}
